use super::{AudioBuffer, BYTES_PER_SAMPLE};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("Audio payload is empty")]
    EmptyPayload,

    #[error("Payload of {len} bytes is not a whole number of {frame_size}-byte frames")]
    PartialFrame { len: usize, frame_size: usize },

    #[error("Invalid PCM layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("WAV error: {0}")]
    Wav(String),
}

/// Decode a standard-alphabet base64 payload into raw bytes
pub fn decode_base64_audio(payload: &str) -> Result<Vec<u8>, DecodeError> {
    BASE64
        .decode(payload.trim())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))
}

/// Turn interleaved 16-bit little-endian PCM into a per-channel buffer.
///
/// Samples are normalized as `sample / 32768.0`. A trailing partial frame is
/// dropped and a zero channel count yields an empty buffer; use
/// [`validate_pcm`] first to reject such payloads instead.
pub fn create_audio_buffer(bytes: &[u8], sample_rate: u32, channel_count: u16) -> AudioBuffer {
    let channel_count = channel_count as usize;
    if channel_count == 0 {
        return AudioBuffer::new(sample_rate, Vec::new());
    }

    let frame_size = BYTES_PER_SAMPLE * channel_count;
    let frames = bytes.len() / frame_size;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];

    for frame in bytes.chunks_exact(frame_size) {
        for (channel, sample) in channels.iter_mut().zip(frame.chunks_exact(BYTES_PER_SAMPLE)) {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            channel.push(value as f32 / 32768.0);
        }
    }

    AudioBuffer::new(sample_rate, channels)
}

/// Strict check that `bytes` can be read as whole PCM frames
pub fn validate_pcm(bytes: &[u8], channel_count: u16) -> Result<(), DecodeError> {
    if channel_count == 0 {
        return Err(DecodeError::InvalidLayout("channel count is zero".into()));
    }
    if bytes.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let frame_size = BYTES_PER_SAMPLE * channel_count as usize;
    if bytes.len() % frame_size != 0 {
        return Err(DecodeError::PartialFrame {
            len: bytes.len(),
            frame_size,
        });
    }
    Ok(())
}

/// `data:<mime>;base64,<payload>`
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

/// Split a base64 `data:` URL into its MIME type and decoded bytes
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), DecodeError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing data: scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing payload separator".into()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| DecodeError::InvalidDataUrl("only base64 payloads are supported".into()))?;

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    Ok((mime_type.to_string(), bytes))
}

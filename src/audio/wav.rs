use super::decode::{decode_data_url, encode_data_url, DecodeError};
use super::AudioBuffer;
use crate::{OmniError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

const WAV_MIME: &str = "audio/wav";

fn to_i16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Encode a buffer as a 16-bit PCM WAV file held in memory
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    let channels = u16::try_from(buffer.channel_count())
        .map_err(|_| OmniError::Io(format!("Too many channels: {}", buffer.channel_count())))?;
    if channels == 0 {
        return Err(OmniError::Io("Cannot encode a buffer without channels".into()));
    }

    let spec = WavSpec {
        channels,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| OmniError::Io(format!("Failed to create WAV writer: {}", e)))?;

        for sample in buffer.interleaved() {
            writer
                .write_sample(to_i16(sample))
                .map_err(|e| OmniError::Io(format!("Failed to write sample: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| OmniError::Io(format!("Failed to finalize WAV data: {}", e)))?;
    }

    let bytes = cursor.into_inner();
    debug!(
        "Encoded {} frames into {} WAV bytes",
        buffer.frames(),
        bytes.len()
    );
    Ok(bytes)
}

/// Decode an in-memory WAV file into a per-channel buffer
pub fn decode_wav(bytes: &[u8]) -> std::result::Result<AudioBuffer, DecodeError> {
    let mut reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| DecodeError::Wav(format!("Failed to open WAV data: {}", e)))?;

    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(DecodeError::Wav(format!(
            "Unsupported sample format: {:?} {} bits",
            spec.sample_format, spec.bits_per_sample
        )));
    }

    let channel_count = spec.channels as usize;
    if channel_count == 0 {
        return Err(DecodeError::InvalidLayout("WAV header has zero channels".into()));
    }

    let mut channels = vec![Vec::new(); channel_count];
    for (index, sample) in reader.samples::<i16>().enumerate() {
        let sample = sample.map_err(|e| DecodeError::Wav(format!("Failed to read sample: {}", e)))?;
        channels[index % channel_count].push(sample as f32 / 32768.0);
    }

    // A truncated file can leave the last frame short; keep frames whole.
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for channel in &mut channels {
        channel.truncate(frames);
    }

    Ok(AudioBuffer::new(spec.sample_rate, channels))
}

/// WAV-encode a buffer as a `data:audio/wav;base64,...` URL
pub fn wav_data_url(buffer: &AudioBuffer) -> Result<String> {
    Ok(encode_data_url(WAV_MIME, &encode_wav(buffer)?))
}

/// Inverse of [`wav_data_url`]
pub fn buffer_from_data_url(url: &str) -> std::result::Result<AudioBuffer, DecodeError> {
    let (mime_type, bytes) = decode_data_url(url)?;
    if mime_type != WAV_MIME {
        return Err(DecodeError::InvalidDataUrl(format!(
            "expected {}, got {}",
            WAV_MIME, mime_type
        )));
    }
    decode_wav(&bytes)
}

//! Audio decode pipeline and playback
//!
//! Speech arrives as base64-encoded 16-bit little-endian PCM. This module
//! turns it into per-channel `f32` buffers, round-trips those through WAV
//! for replay, and hands them to a [`PlaybackSink`].

pub mod decode;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod sink;
pub mod wav;

pub use decode::{
    create_audio_buffer, decode_base64_audio, decode_data_url, encode_data_url, validate_pcm,
    DecodeError,
};
#[cfg(feature = "audio-io")]
pub use output::CpalSink;
pub use sink::{NullSink, PlaybackSink};
pub use wav::{buffer_from_data_url, decode_wav, encode_wav, wav_data_url};

/// Sample rate the speech service renders at
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Channel count of the speech service output
pub const SPEECH_CHANNELS: u16 = 1;

/// Bytes per PCM sample (16-bit)
pub const BYTES_PER_SAMPLE: usize = 2;

/// Decoded, de-interleaved audio ready for a playback device
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build from per-channel sample vectors. All channels must be the same length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        debug_assert!(channels.windows(2).all(|w| w[0].len() == w[1].len()));
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Re-interleave the channels, frame by frame
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames() * self.channel_count());
        for frame in 0..self.frames() {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_dimensions() {
        let buffer = AudioBuffer::new(24_000, vec![vec![0.0; 24_000], vec![0.5; 24_000]]);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frames(), 24_000);
        assert!((buffer.duration_secs() - 1.0).abs() < f32::EPSILON);
        assert_eq!(buffer.channel(1).unwrap()[0], 0.5);
        assert!(buffer.channel(2).is_none());
    }

    #[test]
    fn test_interleaved() {
        let buffer = AudioBuffer::new(8_000, vec![vec![0.1, 0.2], vec![-0.1, -0.2]]);
        assert_eq!(buffer.interleaved(), vec![0.1, -0.1, 0.2, -0.2]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = AudioBuffer::new(24_000, Vec::new());
        assert!(buffer.is_empty());
        assert_eq!(buffer.channel_count(), 0);
        assert_eq!(buffer.duration_secs(), 0.0);
    }
}

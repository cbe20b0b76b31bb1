use super::AudioBuffer;
use crate::session::BusyGuard;
use crate::Result;
use tracing::info;

/// A playback device.
///
/// `play` starts playback and returns without waiting for it to finish.
/// If playback cannot start, `play` returns the error. The sink owns
/// `on_finished` and drops it once the last sample has been played, when
/// the device fails mid-stream, or right away if playback never started.
pub trait PlaybackSink: Send + Sync {
    fn play(&self, buffer: AudioBuffer, on_finished: BusyGuard) -> Result<()>;

    /// Human readable device name for the status line
    fn name(&self) -> String;
}

/// Discards audio; used when output is disabled or no device is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PlaybackSink for NullSink {
    fn play(&self, buffer: AudioBuffer, on_finished: BusyGuard) -> Result<()> {
        info!(
            "Audio output disabled, dropping {:.2}s of audio",
            buffer.duration_secs()
        );
        on_finished.release();
        Ok(())
    }

    fn name(&self) -> String {
        "No audio output".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BusyFlag;

    #[test]
    fn test_null_sink_releases_immediately() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire().unwrap();

        NullSink
            .play(AudioBuffer::new(24_000, vec![vec![0.0; 10]]), guard)
            .unwrap();
        assert!(!flag.is_busy());
    }
}

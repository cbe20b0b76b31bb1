use super::sink::PlaybackSink;
use super::AudioBuffer;
use crate::session::{BusyGuard, SharedGuard};
use crate::{OmniError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

enum PlaybackCommand {
    Play {
        buffer: AudioBuffer,
        on_finished: BusyGuard,
        started: Sender<Result<()>>,
    },
    Shutdown,
}

/// Plays through the default output device.
///
/// cpal streams cannot cross threads on every platform, so the device and
/// its streams live on a dedicated playback thread fed over a channel.
pub struct CpalSink {
    command_tx: Sender<PlaybackCommand>,
    device_name: String,
}

impl CpalSink {
    /// Open the default output device and start the playback thread
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| OmniError::AudioDevice("No output device available".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        info!("Using output device: {}", device_name);

        let device_channels = device
            .default_output_config()
            .map_err(|e| OmniError::AudioDevice(format!("Failed to get output config: {}", e)))?
            .channels();

        let (command_tx, command_rx) = unbounded();
        std::thread::Builder::new()
            .name("omnimind-playback".into())
            .spawn(move || playback_loop(device, device_channels, command_rx))?;

        Ok(Self {
            command_tx,
            device_name,
        })
    }
}

impl PlaybackSink for CpalSink {
    fn play(&self, buffer: AudioBuffer, on_finished: BusyGuard) -> Result<()> {
        let stopped = || OmniError::AudioDevice("Playback thread has stopped".into());
        let (started_tx, started_rx) = bounded(1);
        self.command_tx
            .send(PlaybackCommand::Play {
                buffer,
                on_finished,
                started: started_tx,
            })
            .map_err(|_| stopped())?;

        // Wait for the stream to open so the caller sees device failures
        started_rx.recv().map_err(|_| stopped())?
    }

    fn name(&self) -> String {
        self.device_name.clone()
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        let _ = self.command_tx.send(PlaybackCommand::Shutdown);
    }
}

struct ActivePlayback {
    // Held only to keep the stream running
    _stream: Stream,
    drained: Arc<AtomicBool>,
}

fn playback_loop(device: Device, device_channels: u16, command_rx: Receiver<PlaybackCommand>) {
    let mut active: Option<ActivePlayback> = None;

    loop {
        match command_rx.recv_timeout(Duration::from_millis(250)) {
            Ok(PlaybackCommand::Play {
                buffer,
                on_finished,
                started,
            }) => {
                // One device, no mixing: a new buffer replaces whatever is playing
                active = None;
                let outcome = match start_stream(&device, device_channels, buffer, on_finished) {
                    Ok(playback) => {
                        active = Some(playback);
                        Ok(())
                    }
                    Err(e) => {
                        error!("Failed to start playback: {}", e);
                        Err(e)
                    }
                };
                let _ = started.send(outcome);
            }
            Ok(PlaybackCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                debug!("Playback thread shutting down");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        if active
            .as_ref()
            .map(|p| p.drained.load(Ordering::Acquire))
            .unwrap_or(false)
        {
            active = None;
            info!("Playback finished");
        }
    }
}

fn start_stream(
    device: &Device,
    device_channels: u16,
    buffer: AudioBuffer,
    on_finished: BusyGuard,
) -> Result<ActivePlayback> {
    if buffer.is_empty() {
        warn!("Skipping playback of an empty buffer");
        return Err(OmniError::AudioDevice("Nothing to play".into()));
    }

    // No resampling: the device is opened at the buffer's own rate.
    let config = StreamConfig {
        channels: device_channels,
        sample_rate: SampleRate(buffer.sample_rate()),
        buffer_size: cpal::BufferSize::Default,
    };

    let out_channels = device_channels as usize;
    let source_channels = buffer.channel_count();
    let frames = buffer.frames();
    let drained = Arc::new(AtomicBool::new(false));
    let drained_flag = Arc::clone(&drained);
    let failed_flag = Arc::clone(&drained);
    let on_finished = SharedGuard::new(on_finished);
    let on_error = on_finished.clone();
    let mut position = 0usize;

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(out_channels) {
                    if position < frames {
                        for (c, out) in frame.iter_mut().enumerate() {
                            let source = buffer.channel(c % source_channels).unwrap_or(&[]);
                            *out = source.get(position).copied().unwrap_or(0.0);
                        }
                        position += 1;
                    } else {
                        frame.fill(0.0);
                    }
                }

                if position >= frames && on_finished.release() {
                    drained_flag.store(true, Ordering::Release);
                }
            },
            move |err| {
                error!("Audio output stream error: {}", err);
                // A dead stream never drains, so stop waiting on it
                on_error.release();
                failed_flag.store(true, Ordering::Release);
            },
            None,
        )
        .map_err(|e| OmniError::AudioDevice(format!("Failed to build output stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| OmniError::AudioDevice(format!("Failed to start output stream: {}", e)))?;

    info!(
        "Started playback: {:.2}s at {} Hz",
        frames as f32 / config.sample_rate.0 as f32,
        config.sample_rate.0
    );

    Ok(ActivePlayback {
        _stream: stream,
        drained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BusyFlag;

    #[test]
    fn test_sink_creation() {
        // Might not find a device in CI environments
        if let Ok(sink) = CpalSink::new() {
            assert!(!sink.name().is_empty());
        }
    }

    #[test]
    fn test_empty_buffer_is_reported() {
        if let Ok(sink) = CpalSink::new() {
            let flag = BusyFlag::new();
            let guard = flag.try_acquire().unwrap();
            let result = sink.play(AudioBuffer::new(24_000, Vec::new()), guard);

            assert!(matches!(result, Err(OmniError::AudioDevice(_))));
            assert!(!flag.is_busy());
        }
    }

    #[test]
    fn test_stopped_thread_is_reported() {
        let (command_tx, command_rx) = unbounded();
        drop(command_rx);
        let sink = CpalSink {
            command_tx,
            device_name: "gone".into(),
        };

        let flag = BusyFlag::new();
        let buffer = AudioBuffer::new(24_000, vec![vec![0.0; 10]]);
        let result = sink.play(buffer, flag.try_acquire().unwrap());
        assert!(matches!(result, Err(OmniError::AudioDevice(_))));
        assert!(!flag.is_busy());
    }
}

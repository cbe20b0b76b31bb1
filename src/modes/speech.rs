use super::{ModeEvent, Tool};
use crate::audio::{
    buffer_from_data_url, create_audio_buffer, decode_base64_audio, validate_pcm, wav_data_url,
    DecodeError, PlaybackSink,
};
use crate::config::AppConfig;
use crate::session::{BusyFlag, BusyGuard, GeneratedAudio, History};
use crate::transport::{ModelTransport, Voice};
use crate::{OmniError, Result};
use crossbeam_channel::Sender;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const FAILURE_ALERT: &str = "Error generating speech.";
pub const REPLAY_ALERT: &str = "Could not replay this recording.";

/// How the raw PCM payload is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    /// Reject partial frames instead of truncating them. A payload with no
    /// whole frame is rejected either way.
    pub strict: bool,
}

impl PcmFormat {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            sample_rate: config.speech_sample_rate,
            channels: config.speech_channels,
            strict: config.strict_pcm,
        }
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Speech history, newest first, plus the synthesize and replay flows.
///
/// The in-flight flag covers playback too: it is handed to the sink and
/// stays set until the device has played the last sample.
#[derive(Clone)]
pub struct SpeechMode {
    transport: Arc<dyn ModelTransport>,
    sink: Arc<dyn PlaybackSink>,
    history: History<GeneratedAudio>,
    busy: BusyFlag,
    events: Sender<ModeEvent>,
    format: PcmFormat,
}

impl SpeechMode {
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        sink: Arc<dyn PlaybackSink>,
        events: Sender<ModeEvent>,
        format: PcmFormat,
    ) -> Self {
        Self {
            transport,
            sink,
            history: History::newest_first(),
            busy: BusyFlag::new(),
            events,
            format,
        }
    }

    pub fn history(&self) -> &History<GeneratedAudio> {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn sink_name(&self) -> String {
        self.sink.name()
    }

    fn alert(&self, message: &str) {
        let _ = self.events.send(ModeEvent::Alert {
            tool: Tool::Speech,
            message: message.to_string(),
        });
    }

    /// Synthesize `text`, start playback and record it
    pub async fn synthesize(&self, text: &str, voice: Voice) -> Result<GeneratedAudio> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OmniError::EmptyInput);
        }

        let in_flight = self.busy.try_acquire().ok_or_else(|| {
            warn!("Speech request already in flight, ignoring submission");
            OmniError::Busy
        })?;

        match self.render_and_play(text, voice, in_flight).await {
            Ok(record) => Ok(record),
            Err(e) => {
                error!("Speech request failed: {}", e);
                self.alert(FAILURE_ALERT);
                Err(e)
            }
        }
    }

    async fn render_and_play(
        &self,
        text: &str,
        voice: Voice,
        in_flight: BusyGuard,
    ) -> Result<GeneratedAudio> {
        info!("Requesting speech with voice {}", voice);
        let payload = self.transport.request_speech(text, voice).await?;

        let bytes = decode_base64_audio(&payload)?;
        if self.format.strict {
            validate_pcm(&bytes, self.format.channels)?;
        }

        let buffer = create_audio_buffer(&bytes, self.format.sample_rate, self.format.channels);
        if buffer.is_empty() {
            return Err(DecodeError::EmptyPayload.into());
        }
        debug!(
            "Decoded {} bytes into {} frames ({:.2}s)",
            bytes.len(),
            buffer.frames(),
            buffer.duration_secs()
        );

        let audio_url = match wav_data_url(&buffer) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Could not keep audio for replay: {}", e);
                None
            }
        };

        self.sink.play(buffer, in_flight)?;

        let record = GeneratedAudio::new(text, audio_url);
        self.history.append(record.clone());
        Ok(record)
    }

    /// Play a stored recording again
    pub fn replay(&self, record: &GeneratedAudio) -> Result<()> {
        let in_flight = self.busy.try_acquire().ok_or(OmniError::Busy)?;

        let result = record
            .audio_url
            .as_deref()
            .ok_or_else(|| {
                OmniError::from(DecodeError::InvalidDataUrl("recording has no audio".into()))
            })
            .and_then(|url| buffer_from_data_url(url).map_err(OmniError::from))
            .and_then(|buffer| self.sink.play(buffer, in_flight));

        if let Err(e) = &result {
            error!("Replay of {} failed: {}", record.id, e);
            self.alert(REPLAY_ALERT);
        }
        result
    }
}

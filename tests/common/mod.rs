//! Shared test doubles for the flow tests

#![allow(dead_code)]

use async_trait::async_trait;
use omnimind::audio::{AudioBuffer, PlaybackSink};
use omnimind::session::{BusyGuard, Turn};
use omnimind::transport::{ImageRef, ModelTransport, TransportError, Voice};
use omnimind::OmniError;
use parking_lot::Mutex;
use std::time::Duration;

/// Scripted transport that records every call it receives
pub struct MockTransport {
    text_reply: Result<String, TransportError>,
    image: Result<ImageRef, TransportError>,
    speech: Result<String, TransportError>,
    delay: Option<Duration>,
    pub text_calls: Mutex<Vec<(String, Vec<Turn>)>>,
    pub image_calls: Mutex<Vec<String>>,
    pub speech_calls: Mutex<Vec<(String, Voice)>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        let offline = || TransportError::Network("offline".into());
        Self {
            text_reply: Err(offline()),
            image: Err(offline()),
            speech: Err(offline()),
            delay: None,
            text_calls: Mutex::new(Vec::new()),
            image_calls: Mutex::new(Vec::new()),
            speech_calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_reply(mut self, reply: Result<String, TransportError>) -> Self {
        self.text_reply = reply;
        self
    }

    pub fn with_image(mut self, image: Result<ImageRef, TransportError>) -> Self {
        self.image = image;
        self
    }

    pub fn with_speech(mut self, speech: Result<String, TransportError>) -> Self {
        self.speech = speech;
        self
    }

    /// Hold every response for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ModelTransport for MockTransport {
    async fn request_text_reply(
        &self,
        user_input: &str,
        prior_turns: &[Turn],
    ) -> Result<String, TransportError> {
        self.text_calls
            .lock()
            .push((user_input.to_string(), prior_turns.to_vec()));
        self.wait().await;
        self.text_reply.clone()
    }

    async fn request_image(&self, prompt: &str) -> Result<ImageRef, TransportError> {
        self.image_calls.lock().push(prompt.to_string());
        self.wait().await;
        self.image.clone()
    }

    async fn request_speech(&self, text: &str, voice: Voice) -> Result<String, TransportError> {
        self.speech_calls.lock().push((text.to_string(), voice));
        self.wait().await;
        self.speech.clone()
    }
}

/// Sink that keeps every buffer and, optionally, the in-flight guards
#[derive(Default)]
pub struct RecordingSink {
    hold_guards: bool,
    pub played: Mutex<Vec<AudioBuffer>>,
    held: Mutex<Vec<BusyGuard>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep playback "running" until [`RecordingSink::finish_playback`]
    pub fn holding() -> Self {
        Self {
            hold_guards: true,
            ..Self::default()
        }
    }

    pub fn finish_playback(&self) {
        self.held.lock().clear();
    }
}

impl PlaybackSink for RecordingSink {
    fn play(&self, buffer: AudioBuffer, on_finished: BusyGuard) -> omnimind::Result<()> {
        self.played.lock().push(buffer);
        if self.hold_guards {
            self.held.lock().push(on_finished);
        }
        Ok(())
    }

    fn name(&self) -> String {
        "Recording sink".to_string()
    }
}

/// An output device that refuses to open, like a cpal stream that fails to build
#[derive(Default)]
pub struct FailingSink {
    pub attempts: Mutex<usize>,
}

impl PlaybackSink for FailingSink {
    fn play(&self, _buffer: AudioBuffer, _on_finished: BusyGuard) -> omnimind::Result<()> {
        *self.attempts.lock() += 1;
        Err(OmniError::AudioDevice("Failed to build output stream".into()))
    }

    fn name(&self) -> String {
        "Failing sink".to_string()
    }
}

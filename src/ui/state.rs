//! Application state management
//!
//! Holds the three mode controllers, the per-mode input fields, and the
//! queue of alerts waiting to be shown. Requests are spawned onto the tokio
//! runtime; their results land in the mode histories, which the views read
//! every frame.

use crate::audio::PlaybackSink;
use crate::config::AppConfig;
use crate::modes::image::image_from_record;
use crate::modes::speech::PcmFormat;
use crate::modes::{event_channel, ChatMode, ImageMode, ModeEvent, SpeechMode, Tool};
use crate::session::{GeneratedAudio, GeneratedImage};
use crate::transport::{ModelTransport, Voice};
use crossbeam_channel::Receiver;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{info, warn};
use uuid::Uuid;

/// Central application state
pub struct AppState {
    /// Mode shown in the content area
    pub active_tool: Tool,

    pub chat: ChatMode,
    pub image: ImageMode,
    pub speech: SpeechMode,

    /// Current chat input
    pub chat_input: String,

    /// Current image prompt
    pub image_prompt: String,

    /// Current text to synthesize
    pub speech_text: String,

    /// Selected speech voice
    pub voice: Voice,

    /// Alerts waiting for the user to dismiss them, oldest first
    pub alerts: VecDeque<ModeEvent>,

    /// Whether an API key was configured at startup
    pub api_key_configured: bool,

    /// Decoded gallery textures; `None` marks an image that failed to decode
    pub textures: HashMap<Uuid, Option<egui::TextureHandle>>,

    events_rx: Receiver<ModeEvent>,
    runtime: Handle,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        config: &AppConfig,
        transport: Arc<dyn ModelTransport>,
        sink: Arc<dyn PlaybackSink>,
        runtime: Handle,
    ) -> Self {
        let (events_tx, events_rx) = event_channel();

        Self {
            active_tool: Tool::default(),
            chat: ChatMode::new(Arc::clone(&transport)),
            image: ImageMode::new(Arc::clone(&transport), events_tx.clone()),
            speech: SpeechMode::new(transport, sink, events_tx, PcmFormat::from_config(config)),
            chat_input: String::new(),
            image_prompt: String::new(),
            speech_text: String::new(),
            voice: Voice::default(),
            alerts: VecDeque::new(),
            api_key_configured: config.api_key.is_some(),
            textures: HashMap::new(),
            events_rx,
            runtime,
        }
    }

    pub fn select_tool(&mut self, tool: Tool) {
        if self.active_tool != tool {
            info!("Switching to {:?} mode", tool);
            self.active_tool = tool;
        }
    }

    /// Whether any mode has a request or playback in flight
    pub fn any_busy(&self) -> bool {
        self.chat.is_busy() || self.image.is_busy() || self.speech.is_busy()
    }

    pub fn can_send_chat(&self) -> bool {
        !self.chat_input.trim().is_empty() && !self.chat.is_busy()
    }

    pub fn can_generate_image(&self) -> bool {
        !self.image_prompt.trim().is_empty() && !self.image.is_busy()
    }

    pub fn can_synthesize(&self) -> bool {
        !self.speech_text.trim().is_empty() && !self.speech.is_busy()
    }

    /// Send the chat input and clear it
    pub fn send_chat(&mut self) {
        if !self.can_send_chat() {
            return;
        }

        let text = std::mem::take(&mut self.chat_input);
        let chat = self.chat.clone();
        self.runtime.spawn(async move {
            // Failures are already recorded in the transcript
            let _ = chat.send(&text).await;
        });
    }

    /// Generate an image for the current prompt; the prompt is kept for tweaking
    pub fn generate_image(&mut self) {
        if !self.can_generate_image() {
            return;
        }

        let prompt = self.image_prompt.clone();
        let image = self.image.clone();
        self.runtime.spawn(async move {
            let _ = image.generate(&prompt).await;
        });
    }

    /// Synthesize the current text with the selected voice
    pub fn synthesize_speech(&mut self) {
        if !self.can_synthesize() {
            return;
        }

        let text = self.speech_text.clone();
        let voice = self.voice;
        let speech = self.speech.clone();
        self.runtime.spawn(async move {
            let _ = speech.synthesize(&text, voice).await;
        });
    }

    pub fn replay(&mut self, record: &GeneratedAudio) {
        if let Err(e) = self.speech.replay(record) {
            warn!("Replay rejected: {}", e);
        }
    }

    /// Write a gallery image to the download directory
    pub fn save_image(&mut self, record: &GeneratedImage) {
        let dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        if let Err(e) = crate::modes::image::save_image(record, &dir) {
            warn!("Saving image failed: {}", e);
            self.alerts.push_back(ModeEvent::Alert {
                tool: Tool::Image,
                message: e.user_message(),
            });
        }
    }

    /// Texture for a gallery record, decoding it on first use
    pub fn texture_for(
        &mut self,
        ctx: &egui::Context,
        record: &GeneratedImage,
    ) -> Option<egui::TextureHandle> {
        self.textures
            .entry(record.id)
            .or_insert_with(|| load_texture(ctx, record))
            .clone()
    }

    /// Process incoming events from the mode flows
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.alerts.push_back(event);
        }
    }

    /// Current alert, if any
    pub fn current_alert(&self) -> Option<&ModeEvent> {
        self.alerts.front()
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }
}

fn load_texture(ctx: &egui::Context, record: &GeneratedImage) -> Option<egui::TextureHandle> {
    let image = match image_from_record(record) {
        Ok(image) => image,
        Err(e) => {
            warn!("Gallery record {} has no usable image: {}", record.id, e);
            return None;
        }
    };

    let decoded = match ::image::load_from_memory(&image.bytes) {
        Ok(decoded) => decoded.to_rgba8(),
        Err(e) => {
            warn!("Failed to decode {} image: {}", image.mime_type, e);
            return None;
        }
    };

    let size = [decoded.width() as usize, decoded.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
    Some(ctx.load_texture(
        format!("generated-{}", record.id),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}

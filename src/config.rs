//! Application configuration
//!
//! Defaults, overlaid by an optional TOML file, overlaid by environment
//! variables. A missing API key is tolerated here and only reported by the
//! transport on first use.

use crate::audio::{SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};
use crate::{OmniError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables consulted for the API key, in order
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Credential sent with every request
    pub api_key: Option<String>,

    /// REST endpoint root, without trailing `/models`
    pub base_url: String,

    /// Model used for chat replies
    pub text_model: String,

    /// Model used for image synthesis
    pub image_model: String,

    /// Model used for speech synthesis
    pub speech_model: String,

    /// Optional system instruction sent with chat requests
    pub system_instruction: Option<String>,

    /// Aspect ratio requested for generated images
    pub image_aspect_ratio: String,

    /// Sample rate the speech payload is interpreted at
    pub speech_sample_rate: u32,

    /// Channel count the speech payload is interpreted with
    pub speech_channels: u16,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    /// Reject speech payloads that are empty or end in a partial frame
    pub strict_pcm: bool,

    /// Whether to open an audio output device
    pub enable_audio_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            system_instruction: Some(
                "You are OmniMind, a helpful, knowledgeable and concise assistant.".to_string(),
            ),
            image_aspect_ratio: "1:1".to_string(),
            speech_sample_rate: SPEECH_SAMPLE_RATE,
            speech_channels: SPEECH_CHANNELS,
            request_timeout_secs: 120,
            strict_pcm: false,
            enable_audio_output: true,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("speech_model", &self.speech_model)
            .field("system_instruction", &self.system_instruction)
            .field("image_aspect_ratio", &self.image_aspect_ratio)
            .field("speech_sample_rate", &self.speech_sample_rate)
            .field("speech_channels", &self.speech_channels)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("strict_pcm", &self.strict_pcm)
            .field("enable_audio_output", &self.enable_audio_output)
            .finish()
    }
}

impl AppConfig {
    /// Load defaults, the config file if present, then the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                info!("Loading configuration from {:?}", path);
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());

        if config.api_key.is_none() {
            warn!("No API key configured; requests will fail until GEMINI_API_KEY is set");
        }

        Ok(config)
    }

    /// `$OMNIMIND_CONFIG`, else `<config_dir>/omnimind/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        std::env::var_os("OMNIMIND_CONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("omnimind").join("config.toml")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| OmniError::Config(format!("Invalid config file: {}", e)))
    }

    /// Overlay values from an environment lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
        {
            self.api_key = Some(key.trim().to_string());
        }

        if let Some(url) = lookup("OMNIMIND_BASE_URL") {
            self.base_url = url;
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_strict_pcm(mut self, strict: bool) -> Self {
        self.strict_pcm = strict;
        self
    }

    /// Disable audio output (silent mode)
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(OmniError::Config(format!(
                "Base URL must be http(s): {}",
                self.base_url
            )));
        }

        for (name, model) in [
            ("text_model", &self.text_model),
            ("image_model", &self.image_model),
            ("speech_model", &self.speech_model),
        ] {
            if model.trim().is_empty() {
                return Err(OmniError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.speech_sample_rate == 0 {
            return Err(OmniError::Config("speech_sample_rate must be positive".into()));
        }
        if self.speech_channels == 0 {
            return Err(OmniError::Config("speech_channels must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(OmniError::Config("request_timeout_secs must be positive".into()));
        }

        Ok(())
    }
}

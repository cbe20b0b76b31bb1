pub mod audio;
pub mod config;
pub mod modes;
pub mod session;
pub mod transport;
pub mod ui;

pub use audio::DecodeError;
pub use transport::TransportError;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum OmniError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("A request of this kind is already in flight")]
    Busy,

    #[error("Input is empty")]
    EmptyInput,

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for OmniError {
    fn from(e: std::io::Error) -> Self {
        OmniError::Io(e.to_string())
    }
}

impl OmniError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Every request failure leaves the histories intact
            OmniError::Transport(_) => true,
            OmniError::Decode(_) => true,
            OmniError::Busy => true,
            OmniError::EmptyInput => true,
            // Hardware/device errors may require user intervention
            OmniError::AudioDevice(_) => false,
            OmniError::Config(_) => false,
            OmniError::Io(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            OmniError::Transport(TransportError::MissingCredential) => {
                "No API key configured. Set GEMINI_API_KEY and restart.".to_string()
            }
            OmniError::Transport(_) => {
                "The AI service request failed. Please check your API key and connection."
                    .to_string()
            }
            OmniError::Decode(_) => "The returned audio could not be decoded.".to_string(),
            OmniError::Busy => "Please wait for the current request to finish.".to_string(),
            OmniError::EmptyInput => "Please enter some text first.".to_string(),
            OmniError::AudioDevice(_) => {
                "Audio device error. Please check your speakers.".to_string()
            }
            OmniError::Config(_) => "Configuration error. Please check settings.".to_string(),
            OmniError::Io(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OmniError>;

//! Transport adapter for the remote generative model service
//!
//! Each operation is a single stateless request/response call. Callers see
//! only `Result<_, TransportError>`; wire shapes stay inside this module.

pub mod gemini;
pub mod voice;
mod wire;

pub use gemini::GeminiTransport;
pub use voice::Voice;

use crate::audio::encode_data_url;
use crate::session::Turn;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request blocked: {0}")]
    Blocked(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A generated image as returned inline by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageRef {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn to_data_url(&self) -> String {
        encode_data_url(&self.mime_type, &self.bytes)
    }

    /// File extension matching the MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

/// The three remote operations the UI modes depend on
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Reply to `user_input` given the full prior dialogue
    async fn request_text_reply(
        &self,
        user_input: &str,
        prior_turns: &[Turn],
    ) -> Result<String, TransportError>;

    /// Render exactly one image for `prompt`
    async fn request_image(&self, prompt: &str) -> Result<ImageRef, TransportError>;

    /// Synthesize `text`; returns base64-encoded 16-bit PCM
    async fn request_speech(&self, text: &str, voice: Voice) -> Result<String, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_data_url() {
        let image = ImageRef::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw==");
        assert_eq!(image.extension(), "png");
        assert_eq!(ImageRef::new("image/jpeg", Vec::new()).extension(), "jpg");
    }
}

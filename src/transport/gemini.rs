use super::wire::{
    pcm_rate, Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, ImageConfig, PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use super::{ImageRef, ModelTransport, TransportError, Voice};
use crate::config::AppConfig;
use crate::session::Turn;
use crate::{OmniError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// [`ModelTransport`] over the generative-language REST API
pub struct GeminiTransport {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    image_model: String,
    speech_model: String,
    system_instruction: Option<String>,
    image_aspect_ratio: String,
    speech_sample_rate: u32,
}

impl GeminiTransport {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| OmniError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            speech_model: config.speech_model.clone(),
            system_instruction: config.system_instruction.clone(),
            image_aspect_ratio: config.image_aspect_ratio.clone(),
            speech_sample_rate: config.speech_sample_rate,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// One `generateContent` round trip
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> std::result::Result<GenerateContentResponse, TransportError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TransportError::MissingCredential)?;

        info!("Sending generateContent request to model {}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => match envelope.error.status {
                    Some(code) => format!("{} ({})", envelope.error.message, code),
                    None => envelope.error.message,
                },
                Err(_) => body,
            };
            error!("Request to {} failed with status {}: {}", model, status, message);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Received {} bytes from {}", body.len(), model);
        serde_json::from_str(&body).map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }
}

fn require_non_empty(value: &str, what: &str) -> std::result::Result<(), TransportError> {
    if value.trim().is_empty() {
        return Err(TransportError::InvalidRequest(format!("{} is empty", what)));
    }
    Ok(())
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn request_text_reply(
        &self,
        user_input: &str,
        prior_turns: &[Turn],
    ) -> std::result::Result<String, TransportError> {
        require_non_empty(user_input, "message")?;

        let mut contents: Vec<Content> = prior_turns.iter().map(Content::from_turn).collect();
        contents.push(Content::user_text(user_input));

        let request = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.as_deref().map(Content::instruction),
            generation_config: None,
        };

        debug!("Text request with {} prior turns", prior_turns.len());
        self.generate(&self.text_model, &request).await?.into_text()
    }

    async fn request_image(&self, prompt: &str) -> std::result::Result<ImageRef, TransportError> {
        require_non_empty(prompt, "prompt")?;

        let request = GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                speech_config: None,
                image_config: Some(ImageConfig {
                    aspect_ratio: self.image_aspect_ratio.clone(),
                }),
            }),
        };

        let inline = self
            .generate(&self.image_model, &request)
            .await?
            .into_inline_data()?;

        if !inline.mime_type.starts_with("image/") {
            return Err(TransportError::MalformedResponse(format!(
                "expected an image, got {}",
                inline.mime_type
            )));
        }

        let bytes = BASE64
            .decode(inline.data.trim())
            .map_err(|e| TransportError::MalformedResponse(format!("image payload: {}", e)))?;
        Ok(ImageRef::new(inline.mime_type, bytes))
    }

    async fn request_speech(
        &self,
        text: &str,
        voice: Voice,
    ) -> std::result::Result<String, TransportError> {
        require_non_empty(text, "text")?;

        let request = GenerateContentRequest {
            contents: vec![Content::user_text(text)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.as_str().to_string(),
                        },
                    },
                }),
                image_config: None,
            }),
        };

        let inline = self
            .generate(&self.speech_model, &request)
            .await?
            .into_inline_data()?;

        if let Some(rate) = pcm_rate(&inline.mime_type) {
            if rate != self.speech_sample_rate {
                warn!(
                    "Speech payload is {} Hz but playback assumes {} Hz",
                    rate, self.speech_sample_rate
                );
            }
        }

        Ok(inline.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn transport(config: AppConfig) -> GeminiTransport {
        GeminiTransport::new(&config).unwrap()
    }

    /// Answer one HTTP request with a canned response.
    ///
    /// Returns the base URL to point the transport at, and a handle that
    /// resolves to the raw request the server received.
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1beta", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    fn keyed(base_url: &str) -> GeminiTransport {
        transport(
            AppConfig::default()
                .with_api_key("test-key")
                .with_base_url(base_url),
        )
    }

    #[test]
    fn test_endpoint() {
        let t = transport(AppConfig::default().with_base_url("http://localhost:8080/v1beta/"));
        assert_eq!(
            t.endpoint("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_on_first_call() {
        let t = transport(AppConfig::default());
        let err = t.request_text_reply("Hello", &[]).await.unwrap_err();
        assert_eq!(err, TransportError::MissingCredential);
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_before_io() {
        let t = transport(AppConfig::default());
        assert!(matches!(
            t.request_image("   ").await,
            Err(TransportError::InvalidRequest(_))
        ));
        assert!(matches!(
            t.request_speech("", Voice::Kore).await,
            Err(TransportError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let t = transport(
            AppConfig::default()
                .with_api_key("test-key")
                .with_base_url("http://127.0.0.1:9"),
        );
        assert!(matches!(
            t.request_text_reply("Hello", &[]).await,
            Err(TransportError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_text_reply_over_http() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi there"}]}}]}"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let reply = keyed(&base_url).request_text_reply("Hello", &[]).await;
        assert_eq!(reply.unwrap(), "Hi there");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent "));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains(r#""text":"Hello""#));
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_status() {
        let body =
            r#"{"error":{"code":401,"message":"API key not valid","status":"UNAUTHENTICATED"}}"#;
        let (base_url, server) = serve_once("401 Unauthorized", body).await;

        let err = keyed(&base_url).request_text_reply("Hello", &[]).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 401,
                message: "API key not valid (UNAUTHENTICATED)".to_string(),
            }
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_plain_error_body_is_kept() {
        let (base_url, server) =
            serve_once("503 Service Unavailable", "upstream overloaded").await;

        let err = keyed(&base_url).request_image("a cat").await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 503,
                message: "upstream overloaded".to_string(),
            }
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unparseable_success_is_malformed() {
        let (base_url, server) = serve_once("200 OK", "<html>not json</html>").await;

        assert!(matches!(
            keyed(&base_url).request_speech("Hello", Voice::Kore).await,
            Err(TransportError::MalformedResponse(_))
        ));
        server.await.unwrap();
    }
}

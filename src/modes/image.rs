use super::{ModeEvent, Tool};
use crate::audio::decode_data_url;
use crate::session::{BusyFlag, GeneratedImage, History};
use crate::transport::{ImageRef, ModelTransport};
use crate::{OmniError, Result};
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const FAILURE_ALERT: &str = "Failed to generate image. Please try again.";

/// Gallery of generated images, newest first, plus the generate flow
#[derive(Clone)]
pub struct ImageMode {
    transport: Arc<dyn ModelTransport>,
    history: History<GeneratedImage>,
    busy: BusyFlag,
    events: Sender<ModeEvent>,
}

impl ImageMode {
    pub fn new(transport: Arc<dyn ModelTransport>, events: Sender<ModeEvent>) -> Self {
        Self {
            transport,
            history: History::newest_first(),
            busy: BusyFlag::new(),
            events,
        }
    }

    pub fn history(&self) -> &History<GeneratedImage> {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Render one image for `prompt` and put it at the head of the gallery
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(OmniError::EmptyInput);
        }

        let _in_flight = self.busy.try_acquire().ok_or_else(|| {
            warn!("Image request already in flight, ignoring submission");
            OmniError::Busy
        })?;

        match self.transport.request_image(prompt).await {
            Ok(image) => {
                info!(
                    "Generated {} image ({} bytes)",
                    image.mime_type,
                    image.bytes.len()
                );
                let record = GeneratedImage::new(image.to_data_url(), prompt);
                self.history.append(record.clone());
                Ok(record)
            }
            Err(e) => {
                error!("Image request failed: {}", e);
                let _ = self.events.send(ModeEvent::Alert {
                    tool: Tool::Image,
                    message: FAILURE_ALERT.to_string(),
                });
                Err(e.into())
            }
        }
    }
}

/// Decode the image carried by a gallery record
pub fn image_from_record(record: &GeneratedImage) -> Result<ImageRef> {
    let (mime_type, bytes) = decode_data_url(&record.url)?;
    Ok(ImageRef::new(mime_type, bytes))
}

/// Write a gallery image into `dir`, named after its id
pub fn save_image(record: &GeneratedImage, dir: &Path) -> Result<PathBuf> {
    let image = image_from_record(record)?;
    std::fs::create_dir_all(dir)?;

    let path = dir.join(format!("omnimind-{}.{}", record.id, image.extension()));
    std::fs::write(&path, &image.bytes)?;
    info!("Saved image to {:?}", path);
    Ok(path)
}

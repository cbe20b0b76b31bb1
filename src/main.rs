//! OmniMind - chat, image generation and speech synthesis
//!
//! Main entry point for the desktop shell.

use anyhow::{anyhow, Result};
use eframe::egui;
use omnimind::audio::{NullSink, PlaybackSink};
use omnimind::config::AppConfig;
use omnimind::transport::GeminiTransport;
use omnimind::ui::{AppState, OmniApp};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omnimind=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OmniMind");

    let config = AppConfig::load()?;
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let transport = Arc::new(GeminiTransport::new(&config)?);
    let sink = open_sink(&config);

    let state = AppState::new(&config, transport, sink, runtime.handle().clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("OmniMind"),
        ..Default::default()
    };

    eframe::run_native(
        "OmniMind",
        options,
        Box::new(|cc| Ok(Box::new(OmniApp::new(cc, state)))),
    )
    .map_err(|e| anyhow!("UI error: {}", e))?;

    info!("Shutting down");
    Ok(())
}

#[cfg(feature = "audio-io")]
fn open_sink(config: &AppConfig) -> Arc<dyn PlaybackSink> {
    if !config.enable_audio_output {
        info!("Audio output disabled by configuration");
        return Arc::new(NullSink);
    }

    match omnimind::audio::CpalSink::new() {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            tracing::warn!("Falling back to silent playback: {}", e);
            Arc::new(NullSink)
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn open_sink(_config: &AppConfig) -> Arc<dyn PlaybackSink> {
    info!("Built without audio-io; speech will not be played");
    Arc::new(NullSink)
}

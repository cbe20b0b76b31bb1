//! UI components and application module
//!
//! This module provides the egui/eframe-based shell around the three modes.

mod app;
pub mod components;
mod state;
mod theme;

pub use app::OmniApp;
pub use components::{AlertDialog, ChatView, ImageView, Sidebar, SpeechView};
pub use state::AppState;
pub use theme::Theme;

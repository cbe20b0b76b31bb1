//! UI Components for OmniMind
//!
//! One view per mode, plus the navigation sidebar and the alert dialog.

mod alert;
mod chat_view;
mod image_view;
mod sidebar;
mod speech_view;

pub use alert::AlertDialog;
pub use chat_view::ChatView;
pub use image_view::ImageView;
pub use sidebar::Sidebar;
pub use speech_view::SpeechView;

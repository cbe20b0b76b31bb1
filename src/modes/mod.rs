//! Request flows behind the three UI modes
//!
//! Each mode owns one history and one in-flight flag. A flow validates its
//! input, holds a [`BusyGuard`](crate::session::BusyGuard) for the whole
//! request, and only touches its history once the transport has answered.

pub mod chat;
pub mod image;
pub mod speech;

pub use chat::ChatMode;
pub use image::ImageMode;
pub use speech::SpeechMode;

use crossbeam_channel::{unbounded, Receiver, Sender};

/// The three tools offered by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Chat,
    Image,
    Speech,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Chat, Tool::Image, Tool::Speech];

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Chat => "Chat",
            Tool::Image => "Images",
            Tool::Speech => "Voice",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Chat => "💬",
            Tool::Image => "🖼",
            Tool::Speech => "🔊",
        }
    }

    /// Header title
    pub fn title(&self) -> &'static str {
        match self {
            Tool::Chat => "Cognitive Dialogue",
            Tool::Image => "Latent Space Imaging",
            Tool::Speech => "Neural Phonetics",
        }
    }
}

/// Notifications from a flow to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeEvent {
    /// Blocking notification the user must dismiss
    Alert { tool: Tool, message: String },
}

/// Channel pair carrying [`ModeEvent`]s
pub fn event_channel() -> (Sender<ModeEvent>, Receiver<ModeEvent>) {
    unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_titles() {
        assert_eq!(Tool::default(), Tool::Chat);
        assert_eq!(Tool::Image.title(), "Latent Space Imaging");
        assert_eq!(Tool::Speech.label(), "Voice");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One dialogue turn as replayed to the text endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Synthesized on this side (greeting, error notice); shown but never replayed.
    pub local: bool,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            local: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// A locally synthesized assistant message
    pub fn local(content: impl Into<String>) -> Self {
        Self {
            local: true,
            ..Self::new(Role::Assistant, content)
        }
    }

    pub fn to_turn(&self) -> Turn {
        Turn::new(self.role, self.content.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: Uuid,
    /// `data:` URL carrying the encoded image
    pub url: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            prompt: prompt.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAudio {
    pub id: Uuid,
    pub text: String,
    pub audio_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl GeneratedAudio {
    pub fn new(text: impl Into<String>, audio_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            audio_url,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_messages_are_assistant_role() {
        let msg = Message::local("Hello!");
        assert!(msg.local);
        assert_eq!(msg.role, Role::Assistant);

        let msg = Message::user("Hi");
        assert!(!msg.local);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Message::user("same");
        let b = Message::user("same");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::new(Role::Assistant, "x")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"x"}"#);
    }
}

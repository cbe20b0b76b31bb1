use crate::session::{BusyFlag, History, Message, Turn};
use crate::transport::ModelTransport;
use crate::{OmniError, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const GREETING: &str = "Hello! I'm OmniMind. How can I assist you today?";

/// Shown when the service answers with nothing
pub const EMPTY_REPLY: &str = "Sorry, I encountered an error.";

/// Shown inline when the request fails
pub const FAILURE_NOTICE: &str =
    "There was an issue processing your request. Please check your API key and connection.";

/// Chat transcript plus the send flow
#[derive(Clone)]
pub struct ChatMode {
    transport: Arc<dyn ModelTransport>,
    history: History<Message>,
    busy: BusyFlag,
}

impl ChatMode {
    /// New transcript seeded with the greeting
    pub fn new(transport: Arc<dyn ModelTransport>) -> Self {
        let history = History::chronological();
        history.append(Message::local(GREETING));

        Self {
            transport,
            history,
            busy: BusyFlag::new(),
        }
    }

    pub fn history(&self) -> &History<Message> {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Dialogue replayed to the service: everything except local messages
    pub fn prior_turns(&self) -> Vec<Turn> {
        self.history
            .all()
            .iter()
            .filter(|message| !message.local)
            .map(Message::to_turn)
            .collect()
    }

    /// Send one user message and append the reply.
    ///
    /// On success the transcript grows by the user message followed by the
    /// assistant reply. On transport failure the reply is replaced by a
    /// local notice and the error is returned.
    pub async fn send(&self, input: &str) -> Result<Message> {
        let input = input.trim();
        if input.is_empty() {
            return Err(OmniError::EmptyInput);
        }

        let _in_flight = self.busy.try_acquire().ok_or_else(|| {
            warn!("Chat request already in flight, ignoring submission");
            OmniError::Busy
        })?;

        let prior_turns = self.prior_turns();
        self.history.append(Message::user(input));

        match self.transport.request_text_reply(input, &prior_turns).await {
            Ok(reply) => {
                let message = if reply.trim().is_empty() {
                    warn!("Service returned an empty reply");
                    Message::local(EMPTY_REPLY)
                } else {
                    Message::assistant(reply)
                };
                info!("Chat reply received ({} chars)", message.content.len());
                self.history.append(message.clone());
                Ok(message)
            }
            Err(e) => {
                error!("Chat request failed: {}", e);
                self.history.append(Message::local(FAILURE_NOTICE));
                Err(e.into())
            }
        }
    }
}

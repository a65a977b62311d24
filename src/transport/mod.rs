//! Chat transport abstractions.
//!
//! Login, session handling and the wire protocol belong to the transport
//! implementation; the bot only asks whether it is ready, resolves recipients
//! and sends text.

mod console;
mod memory;

use async_trait::async_trait;

pub use console::ConsoleTransport;
pub use memory::{MemoryTransport, SentMessage};

/// A resolved chat contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientHandle {
    pub id: String,
    pub display_name: String,
}

impl RecipientHandle {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
        }
    }
}

/// Outbound side of a chat channel.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether the channel is logged in and can deliver messages.
    fn is_ready(&self) -> bool;

    /// Look up a contact by id.
    async fn resolve_recipient(&self, id: &str) -> Option<RecipientHandle>;

    /// Deliver one message. Returns `false` when the channel reported a failure.
    async fn send(&self, recipient: &RecipientHandle, text: &str) -> bool;
}

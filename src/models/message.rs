//! Inbound chat events.

/// Kind of an inbound chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
    Voice,
    Other,
}

/// A message delivered by the chat transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    pub is_group: bool,
    pub kind: MessageKind,
}

impl InboundMessage {
    /// Create a direct text message.
    pub fn direct_text(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_name: String::new(),
            text: text.into(),
            is_group: false,
            kind: MessageKind::Text,
        }
    }

    /// Only direct text messages are acted upon.
    pub fn is_actionable(&self) -> bool {
        !self.is_group && self.kind == MessageKind::Text
    }
}

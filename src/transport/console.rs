//! Transport that writes messages to standard output.

use std::io::Write;

use async_trait::async_trait;

use crate::transport::{RecipientHandle, Transport};

/// Local stand-in for a chat channel: every id resolves and every message is
/// printed.
#[derive(Debug, Default, Clone)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn is_ready(&self) -> bool {
        true
    }

    async fn resolve_recipient(&self, id: &str) -> Option<RecipientHandle> {
        let id = id.trim();
        (!id.is_empty()).then(|| RecipientHandle::new(id))
    }

    async fn send(&self, recipient: &RecipientHandle, text: &str) -> bool {
        let mut out = std::io::stdout().lock();
        writeln!(out, "──▶ {}", recipient.display_name)
            .and_then(|_| writeln!(out, "{text}\n"))
            .and_then(|_| out.flush())
            .is_ok()
    }
}

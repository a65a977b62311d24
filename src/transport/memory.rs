//! In-process transport that records every delivery.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::transport::{RecipientHandle, Transport};

/// A message accepted by [`MemoryTransport`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipient: String,
    pub text: String,
    pub at: Instant,
}

/// Transport that keeps sent messages in memory.
///
/// Used by the `chat` command to capture replies, and as a controllable
/// channel in tests: readiness can be toggled, contacts can be restricted
/// and individual recipients can be made to fail.
#[derive(Debug)]
pub struct MemoryTransport {
    ready: AtomicBool,
    known: Option<HashSet<String>>,
    failing: HashSet<String>,
    attempts: Mutex<Vec<String>>,
    sent: Mutex<Vec<SentMessage>>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    /// A ready transport where every id resolves.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            known: None,
            failing: HashSet::new(),
            attempts: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Only the given ids resolve.
    pub fn with_contacts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sends to these ids report failure.
    pub fn with_failing<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Recipients of every send attempt, in order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Successfully delivered messages, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn resolve_recipient(&self, id: &str) -> Option<RecipientHandle> {
        let known = self.known.as_ref().is_none_or(|k| k.contains(id));
        (known && !id.is_empty()).then(|| RecipientHandle::new(id))
    }

    async fn send(&self, recipient: &RecipientHandle, text: &str) -> bool {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(recipient.id.clone());
        }
        if self.failing.contains(&recipient.id) {
            return false;
        }
        match self.sent.lock() {
            Ok(mut sent) => {
                sent.push(SentMessage {
                    recipient: recipient.id.clone(),
                    text: text.to_string(),
                    at: Instant::now(),
                });
                true
            }
            Err(_) => false,
        }
    }
}

// src/services/dispatcher.rs

//! Paced delivery to one or many recipients.

use std::sync::Arc;
use std::time::Duration;

use crate::models::{DispatchReport, RecipientList, RecipientOutcome};
use crate::transport::Transport;

/// Delivers messages through a transport, one recipient at a time.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    recipients: RecipientList,
    pacing: Duration,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, recipients: RecipientList, pacing: Duration) -> Self {
        Self {
            transport,
            recipients,
            pacing,
        }
    }

    /// Whether the transport can deliver right now.
    pub fn is_ready(&self) -> bool {
        self.transport.is_ready()
    }

    pub fn recipients(&self) -> &RecipientList {
        &self.recipients
    }

    /// Send `text` to a single recipient. Returns whether it was delivered.
    pub async fn send_to_one(&self, recipient: &str, text: &str) -> bool {
        self.deliver(recipient, text).await.is_success()
    }

    /// Send `text` to every recipient in list order.
    ///
    /// When the transport is not ready nothing is attempted and every recipient
    /// is counted as failed. Consecutive sends are separated by the pacing
    /// delay; failures are recorded and never retried.
    pub async fn broadcast(&self, text: &str) -> DispatchReport {
        let mut report = DispatchReport::default();

        if !self.transport.is_ready() {
            log::error!(
                "Transport not ready; skipping broadcast to {} recipients",
                self.recipients.len()
            );
            for recipient in self.recipients.iter() {
                report.record(recipient, RecipientOutcome::TransportNotReady);
            }
            return report;
        }

        for (index, recipient) in self.recipients.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
            let outcome = self.deliver(recipient, text).await;
            report.record(recipient, outcome);
        }

        log::info!(
            "Broadcast finished: {} delivered, {} failed",
            report.success_count,
            report.failure_count
        );
        report
    }

    async fn deliver(&self, recipient: &str, text: &str) -> RecipientOutcome {
        if !self.transport.is_ready() {
            log::error!("Transport not ready; cannot send to {}", recipient);
            return RecipientOutcome::TransportNotReady;
        }

        let Some(handle) = self.transport.resolve_recipient(recipient).await else {
            log::warn!("Recipient {} not found", recipient);
            return RecipientOutcome::NotFound;
        };

        if self.transport.send(&handle, text).await {
            log::info!("Sent message to {}", recipient);
            RecipientOutcome::Delivered
        } else {
            log::warn!("Failed to send message to {}", recipient);
            RecipientOutcome::SendFailed
        }
    }
}

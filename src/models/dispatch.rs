//! Recipient list and delivery accounting.

use serde::Serialize;

/// Ordered, deduplicated set of recipient identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientList {
    ids: Vec<String>,
}

impl RecipientList {
    /// Build the list from the admin id followed by the configured targets.
    /// Blank ids are skipped and later duplicates dropped.
    pub fn new<I, S>(admin: Option<&str>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<String> = Vec::new();
        let admin = admin.map(|a| a.to_string());
        let candidates = admin
            .into_iter()
            .chain(targets.into_iter().map(|t| t.as_ref().to_string()));

        for candidate in candidates {
            let id = candidate.trim();
            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }

        Self { ids }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Delivery result for a single recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecipientOutcome {
    Delivered,
    NotFound,
    SendFailed,
    TransportNotReady,
}

impl RecipientOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Summary of one broadcast.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub outcomes: Vec<(String, RecipientOutcome)>,
}

impl DispatchReport {
    /// Record the outcome for one recipient.
    pub fn record(&mut self, recipient: &str, outcome: RecipientOutcome) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.outcomes.push((recipient.to_string(), outcome));
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }
}

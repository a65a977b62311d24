// src/models/mod.rs

//! Domain models for the digest bot.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod dispatch;
mod message;
mod news;
mod selectors;
mod source;

// Re-export all public types
pub use config::{
    AutoReply, CleaningConfig, Config, DigestConfig, DispatchConfig, HttpConfig, LoggingConfig,
    RecipientsConfig, ScheduleConfig,
};
pub use dispatch::{DispatchReport, RecipientList, RecipientOutcome};
pub use message::{InboundMessage, MessageKind};
pub use news::{Digest, MAX_TITLE_CHARS, NewsItem};
pub use selectors::SourceSelectors;
pub use source::SourceDescriptor;

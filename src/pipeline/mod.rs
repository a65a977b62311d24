//! Pipeline entry points.
//!
//! - `DigestPipeline`: fetch, deduplicate and select one digest
//! - `run_daily_push`: broadcast the digest to every recipient
//! - `ChatHandler`: answer direct chat commands
//! - `run_scheduler`: fire the daily push at a fixed local time
//! - `DigestBot`: all of the above wired to one transport

mod bot;
mod chat;
mod digest;
mod push;
mod schedule;

pub use bot::DigestBot;
pub use chat::ChatHandler;
pub use digest::DigestPipeline;
pub use push::{PushOutcome, announce_startup, run_daily_push};
pub use schedule::{next_run_after, run_scheduler};

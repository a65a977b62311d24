// src/pipeline/push.rs

//! Daily push to all recipients.

use crate::models::{DispatchReport, ScheduleConfig};
use crate::pipeline::DigestPipeline;
use crate::services::{Dispatcher, format_digest};
use crate::utils::truncate_chars;

/// What a push run did.
#[derive(Debug)]
pub enum PushOutcome {
    /// Transport was not ready; nothing was fetched
    NotReady,
    /// No item survived selection; nothing was sent
    NoNews,
    /// The digest was broadcast
    Delivered(DispatchReport),
}

/// Fetch a digest and broadcast it.
pub async fn run_daily_push(
    pipeline: &DigestPipeline,
    dispatcher: &Dispatcher,
) -> PushOutcome {
    log::info!(
        "Daily push starting ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    if !dispatcher.is_ready() {
        log::error!("Transport not ready, skipping push");
        return PushOutcome::NotReady;
    }

    let digest = pipeline.run().await;
    if digest.is_empty() {
        log::info!("No news fetched, skipping push");
        return PushOutcome::NoNews;
    }

    let message = format_digest(&digest);
    log::info!("Pushing digest to {} recipients...", dispatcher.recipients().len());
    let report = dispatcher.broadcast(&message).await;

    log::info!(
        "Push complete: {} succeeded, {} failed",
        report.success_count,
        report.failure_count
    );
    for (index, item) in digest.items.iter().enumerate() {
        log::info!("  {}. {}...", index + 1, truncate_chars(item.title(), 50));
    }

    PushOutcome::Delivered(report)
}

/// Tell the administrator the bot is up. Returns whether the notice was sent.
pub async fn announce_startup(
    dispatcher: &Dispatcher,
    admin: &str,
    schedule: &ScheduleConfig,
) -> bool {
    if admin.trim().is_empty() {
        return false;
    }
    let notice = format!(
        "✅ 电信资讯机器人已启动！\n\n每天{}将为您推送电信行业最新资讯。",
        schedule.label()
    );
    dispatcher.send_to_one(admin, &notice).await
}

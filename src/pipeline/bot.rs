// src/pipeline/bot.rs

//! Wires the pipeline, dispatcher and chat handler together.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, Digest, InboundMessage};
use crate::pipeline::{
    ChatHandler, DigestPipeline, PushOutcome, announce_startup, run_daily_push, run_scheduler,
};
use crate::services::{Aggregator, CommandRouter, Dispatcher};
use crate::transport::Transport;

/// The assembled digest bot.
pub struct DigestBot {
    config: Arc<Config>,
    pipeline: Arc<DigestPipeline>,
    dispatcher: Dispatcher,
    chat: ChatHandler,
}

impl DigestBot {
    /// Build the bot with HTTP extractors for every active source.
    pub fn from_config(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let aggregator = Aggregator::from_config(&config)?;
        Ok(Self::with_aggregator(config, aggregator, transport))
    }

    /// Build the bot around an existing aggregator.
    pub fn with_aggregator(
        config: Config,
        aggregator: Aggregator,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let pipeline = Arc::new(DigestPipeline::new(aggregator, config.digest.count));
        let dispatcher = Dispatcher::new(
            Arc::clone(&transport),
            config.recipient_list(),
            Duration::from_millis(config.dispatch.pacing_ms),
        );
        let chat = ChatHandler::new(
            CommandRouter::from_config(&config),
            Arc::clone(&pipeline),
            transport,
        );

        Self {
            config: Arc::new(config),
            pipeline,
            dispatcher,
            chat,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch and select a fresh digest.
    pub async fn digest(&self) -> Digest {
        self.pipeline.run().await
    }

    /// Run one scheduled push.
    pub async fn daily_push(&self) -> PushOutcome {
        run_daily_push(&self.pipeline, &self.dispatcher).await
    }

    /// Answer one inbound chat message.
    pub async fn handle_message(&self, message: &InboundMessage) -> Vec<String> {
        self.chat.handle(message).await
    }

    /// Notify the administrator that the bot is running.
    pub async fn announce_startup(&self) -> bool {
        announce_startup(
            &self.dispatcher,
            &self.config.recipients.admin,
            &self.config.schedule,
        )
        .await
    }

    /// Push every day at the configured time until `shutdown` resolves.
    pub async fn run_until<S>(self: Arc<Self>, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let schedule = self.config.schedule;
        let job = move || {
            let bot = Arc::clone(&self);
            async move {
                let outcome = bot.daily_push().await;
                log::debug!("Scheduled push finished: {:?}", outcome);
            }
        };
        run_scheduler(schedule, job, shutdown).await;
    }
}

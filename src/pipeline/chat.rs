// src/pipeline/chat.rs

//! Inbound message handling.

use std::sync::Arc;

use crate::models::InboundMessage;
use crate::pipeline::DigestPipeline;
use crate::services::commands::{NEWS_ACK, SELF_TEST_REPLY};
use crate::services::{CommandRouter, Route};
use crate::transport::Transport;

/// Answers direct chat messages.
pub struct ChatHandler {
    router: CommandRouter,
    pipeline: Arc<DigestPipeline>,
    transport: Arc<dyn Transport>,
}

impl ChatHandler {
    pub fn new(
        router: CommandRouter,
        pipeline: Arc<DigestPipeline>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            router,
            pipeline,
            transport,
        }
    }

    /// Handle one inbound message and return the replies that were sent.
    ///
    /// Group and non-text messages are ignored. A news request sends an
    /// acknowledgement first and then the digest.
    pub async fn handle(&self, message: &InboundMessage) -> Vec<String> {
        if !message.is_actionable() {
            return Vec::new();
        }

        let text = message.text.trim();
        let name: &str = if message.sender_name.is_empty() {
            "unknown"
        } else {
            &message.sender_name
        };
        log::info!("Message from {}({}): {}", name, message.sender_id, text);

        let mut replies = Vec::new();
        match self.router.route(text) {
            Route::Help => {
                let help = self.router.help_text();
                self.reply(message, help, &mut replies).await;
            }
            Route::News => {
                self.reply(message, NEWS_ACK.to_string(), &mut replies).await;
                let digest = self.pipeline.render().await;
                self.reply(message, digest, &mut replies).await;
            }
            Route::SelfTest => {
                self.reply(message, SELF_TEST_REPLY.to_string(), &mut replies)
                    .await;
            }
            Route::AutoReply(reply) => {
                let reply = reply.to_string();
                self.reply(message, reply, &mut replies).await;
            }
            Route::Ignore => {}
        }
        replies
    }

    async fn reply(&self, message: &InboundMessage, text: String, replies: &mut Vec<String>) {
        let Some(handle) = self.transport.resolve_recipient(&message.sender_id).await else {
            log::warn!("Cannot reply: sender {} not found", message.sender_id);
            return;
        };
        if self.transport.send(&handle, &text).await {
            replies.push(text);
        } else {
            log::warn!("Failed to reply to {}", message.sender_id);
        }
    }
}

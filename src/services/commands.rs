//! Inbound chat command routing.

use std::fmt::Write;

use crate::models::{AutoReply, Config, ScheduleConfig};

/// Tokens that request the help text.
pub const HELP_TOKENS: &[&str] = &["帮助", "help", "?"];

/// Tokens that request an immediate digest.
pub const NEWS_TOKENS: &[&str] = &["新闻", "资讯", "最新"];

/// Tokens that request a liveness check.
pub const SELF_TEST_TOKENS: &[&str] = &["测试", "test"];

/// Acknowledgement sent before a digest is fetched on demand.
pub const NEWS_ACK: &str = "📥 正在获取最新资讯，请稍候...";

/// Reply to a self-test command.
pub const SELF_TEST_REPLY: &str = "🤖 机器人运行正常！\n\n输入\"帮助\"查看更多命令。";

/// Action chosen for an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Help,
    News,
    SelfTest,
    AutoReply(&'a str),
    Ignore,
}

/// Maps inbound text to exactly one action.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    schedule: ScheduleConfig,
    news_count: usize,
    auto_replies: Vec<AutoReply>,
}

impl CommandRouter {
    pub fn new(schedule: ScheduleConfig, news_count: usize, auto_replies: Vec<AutoReply>) -> Self {
        Self {
            schedule,
            news_count,
            auto_replies,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.schedule,
            config.digest.count,
            config.auto_replies.clone(),
        )
    }

    /// Route a message text.
    ///
    /// Commands are exact matches on the trimmed, lowercased text; keywords are
    /// case-sensitive substring matches on the trimmed text, first entry wins.
    pub fn route(&self, text: &str) -> Route<'_> {
        let text = text.trim();
        let command = text.to_lowercase();

        if HELP_TOKENS.contains(&command.as_str()) {
            return Route::Help;
        }
        if NEWS_TOKENS.contains(&command.as_str()) {
            return Route::News;
        }
        if SELF_TEST_TOKENS.contains(&command.as_str()) {
            return Route::SelfTest;
        }

        self.auto_replies
            .iter()
            .find(|r| text.contains(r.keyword.as_str()))
            .map_or(Route::Ignore, |r| Route::AutoReply(&r.reply))
    }

    /// Help text listing commands, keywords and the push schedule.
    pub fn help_text(&self) -> String {
        let mut help = String::from("📖 电信资讯机器人使用帮助\n\n【命令列表】\n");
        let _ = writeln!(help, "• {} - 立即获取当日资讯", NEWS_TOKENS.join(" / "));
        help.push_str("• 测试 - 测试机器人是否正常运行\n");
        help.push_str("• 帮助 - 显示本帮助信息\n");

        let described: Vec<_> = self
            .auto_replies
            .iter()
            .filter_map(|r| r.description.as_deref().map(|d| (r.keyword.as_str(), d)))
            .collect();
        if !described.is_empty() {
            help.push_str("\n【自动回复关键词】\n");
            for (keyword, description) in described {
                let _ = writeln!(help, "• {keyword} - {description}");
            }
        }

        help.push_str("\n【推送说明】\n");
        let _ = write!(
            help,
            "每天 {} 自动推送 {} 条电信行业资讯",
            self.schedule.label(),
            self.news_count
        );
        help.push_str("\n\n【联系我们】\n如有建议或问题，欢迎随时联系");
        help
    }
}

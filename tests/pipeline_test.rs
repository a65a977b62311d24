use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use telecom_digest::{
    error::AppError,
    models::{
        Config, InboundMessage, MessageKind, NewsItem, RecipientOutcome, SourceDescriptor,
        SourceSelectors,
    },
    pipeline::{DigestBot, PushOutcome},
    services::{
        Aggregator, FetchOutcome, NewsSource,
        commands::NEWS_ACK,
        formatter::{DIGEST_HEADER, EMPTY_DIGEST_MESSAGE},
    },
    transport::MemoryTransport,
};
use tokio::time::sleep;

const SHARED_PREFIX: &str = "工信部部署推进新型信息基础设施建设工作会议在京召开全面推动我国";

struct ScriptedSource {
    descriptor: SourceDescriptor,
    delay: Duration,
    titles: Vec<String>,
    fail: bool,
}

impl ScriptedSource {
    fn new(id: &str, name: &str, delay_ms: u64, titles: &[&str]) -> Arc<dyn NewsSource> {
        Arc::new(Self {
            descriptor: descriptor(id, name),
            delay: Duration::from_millis(delay_ms),
            titles: titles.iter().map(|t| t.to_string()).collect(),
            fail: false,
        })
    }

    fn failing(id: &str) -> Arc<dyn NewsSource> {
        Arc::new(Self {
            descriptor: descriptor(id, id),
            delay: Duration::ZERO,
            titles: Vec::new(),
            fail: true,
        })
    }
}

fn descriptor(id: &str, name: &str) -> SourceDescriptor {
    SourceDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        urls: vec![format!("https://{id}.example.com/news/")],
        base_url: format!("https://{id}.example.com"),
        enabled: true,
        mandatory: false,
        quota: 5,
        page_limit: 10,
        selectors: SourceSelectors::fallback(),
    }
}

#[async_trait]
impl NewsSource for ScriptedSource {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn fetch(&self) -> FetchOutcome {
        sleep(self.delay).await;
        if self.fail {
            return Err(AppError::fetch(&self.descriptor.id, "connection refused"));
        }
        Ok(self
            .titles
            .iter()
            .enumerate()
            .filter_map(|(i, title)| {
                NewsItem::new(
                    title,
                    format!("{}/news/{i}.html", self.descriptor.base_url),
                    "2024-03-01",
                    &self.descriptor.name,
                )
            })
            .collect())
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.recipients.admin = "admin".to_string();
    config.recipients.targets = vec!["alice".to_string(), "bob".to_string()];
    config.dispatch.pacing_ms = 1000;
    config.digest.count = 5;
    config
}

/// Two unique items, one cross-source duplicate and one hung source.
fn scenario_aggregator() -> Aggregator {
    let first = format!("{SHARED_PREFIX}五G网络建设");
    let duplicate = format!("{SHARED_PREFIX}千兆光网发展");
    Aggregator::new(
        vec![
            ScriptedSource::new(
                "miit",
                "工信部",
                200,
                &[first.as_str(), "中国联通发布算力网络新成果"],
            ),
            ScriptedSource::new("unicom", "中国联通", 50, &[duplicate.as_str()]),
            ScriptedSource::new("slow", "慢速来源", 120_000, &["永远不会到达的资讯标题"]),
        ],
        Duration::from_secs(30),
    )
}

fn bot_with(transport: Arc<MemoryTransport>, aggregator: Aggregator) -> DigestBot {
    DigestBot::with_aggregator(config(), aggregator, transport)
}

#[tokio::test(start_paused = true)]
async fn test_aggregate_keeps_raw_items_and_reports_timeout() {
    let outcome = scenario_aggregator().collect().await;

    assert_eq!(outcome.items.len(), 3);
    assert_eq!(outcome.source_failures(), 1);

    let slow = &outcome.sources[2];
    assert_eq!(slow.id, "slow");
    assert_eq!(slow.item_count, 0);
    assert!(slow.error.as_deref().is_some_and(|e| e.contains("timed out")));
}

#[tokio::test(start_paused = true)]
async fn test_digest_dedups_and_survives_timeout() {
    let transport = Arc::new(MemoryTransport::new());
    let bot = bot_with(transport, scenario_aggregator());

    let digest = bot.digest().await;

    assert_eq!(digest.len(), 2);
    assert!(digest.items[0].title().ends_with("五G网络建设"));
    assert_eq!(digest.items[1].title(), "中国联通发布算力网络新成果");
    assert_eq!(digest.items[0].source_name(), "工信部");
}

#[tokio::test(start_paused = true)]
async fn test_daily_push_broadcasts_numbered_digest() {
    let transport = Arc::new(MemoryTransport::new());
    let bot = bot_with(Arc::clone(&transport), scenario_aggregator());

    let PushOutcome::Delivered(report) = bot.daily_push().await else {
        panic!("expected a delivered push");
    };
    assert_eq!(report.success_count, 3);
    assert_eq!(report.failure_count, 0);

    let sent = transport.sent();
    let recipients: Vec<_> = sent.iter().map(|m| m.recipient.as_str()).collect();
    assert_eq!(recipients, vec!["admin", "alice", "bob"]);

    let text = &sent[0].text;
    assert!(text.starts_with(DIGEST_HEADER));
    assert!(text.contains("\n1. "));
    assert!(text.contains("\n2. "));
    assert!(!text.contains("\n3. "));
    assert!(sent.iter().all(|m| &m.text == text));

    assert!(sent[1].at - sent[0].at >= Duration::from_millis(1000));
    assert!(sent[2].at - sent[1].at >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_daily_push_skips_when_transport_not_ready() {
    let transport = Arc::new(MemoryTransport::new());
    transport.set_ready(false);
    let bot = bot_with(Arc::clone(&transport), scenario_aggregator());

    assert!(matches!(bot.daily_push().await, PushOutcome::NotReady));
    assert!(transport.attempts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_daily_push_skips_when_every_source_fails() {
    let transport = Arc::new(MemoryTransport::new());
    let aggregator = Aggregator::new(
        vec![ScriptedSource::failing("a"), ScriptedSource::failing("b")],
        Duration::from_secs(30),
    );
    let bot = bot_with(Arc::clone(&transport), aggregator);

    assert!(matches!(bot.daily_push().await, PushOutcome::NoNews));
    assert!(transport.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_recipient_does_not_stop_broadcast() {
    let transport = Arc::new(MemoryTransport::new().with_contacts(["admin", "bob"]));
    let bot = bot_with(Arc::clone(&transport), scenario_aggregator());

    let PushOutcome::Delivered(report) = bot.daily_push().await else {
        panic!("expected a delivered push");
    };
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failure_count, 1);
    assert_eq!(
        report.outcomes[1],
        ("alice".to_string(), RecipientOutcome::NotFound)
    );
}

#[tokio::test(start_paused = true)]
async fn test_chat_keyword_and_smalltalk() {
    let transport = Arc::new(MemoryTransport::new());
    let bot = bot_with(Arc::clone(&transport), scenario_aggregator());

    let replies = bot
        .handle_message(&InboundMessage::direct_text("alice", "5G"))
        .await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].starts_with("📶 5G"));

    let replies = bot
        .handle_message(&InboundMessage::direct_text("alice", "随便聊聊"))
        .await;
    assert!(replies.is_empty());
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_chat_news_request_sends_ack_then_digest() {
    let transport = Arc::new(MemoryTransport::new());
    let bot = bot_with(Arc::clone(&transport), scenario_aggregator());

    let replies = bot
        .handle_message(&InboundMessage::direct_text("alice", " 新闻 "))
        .await;

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0], NEWS_ACK);
    assert!(replies[1].starts_with(DIGEST_HEADER));
    assert!(replies[1].contains("中国联通发布算力网络新成果"));
}

#[tokio::test(start_paused = true)]
async fn test_chat_news_request_without_news() {
    let transport = Arc::new(MemoryTransport::new());
    let aggregator = Aggregator::new(vec![ScriptedSource::failing("a")], Duration::from_secs(30));
    let bot = bot_with(Arc::clone(&transport), aggregator);

    let replies = bot
        .handle_message(&InboundMessage::direct_text("alice", "最新"))
        .await;

    assert_eq!(replies, vec![NEWS_ACK.to_string(), EMPTY_DIGEST_MESSAGE.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_chat_ignores_group_and_media_messages() {
    let transport = Arc::new(MemoryTransport::new());
    let bot = bot_with(Arc::clone(&transport), scenario_aggregator());

    let mut group = InboundMessage::direct_text("alice", "帮助");
    group.is_group = true;
    assert!(bot.handle_message(&group).await.is_empty());

    let mut image = InboundMessage::direct_text("alice", "帮助");
    image.kind = MessageKind::Image;
    assert!(bot.handle_message(&image).await.is_empty());

    assert!(transport.attempts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_startup_notice_goes_to_admin() {
    let transport = Arc::new(MemoryTransport::new());
    let bot = bot_with(Arc::clone(&transport), scenario_aggregator());

    assert!(bot.announce_startup().await);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "admin");
    assert!(sent[0].text.contains("每天9:00"));
}

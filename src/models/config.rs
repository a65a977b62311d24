//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{RecipientList, SourceDescriptor};
use crate::utils::normalize_whitespace;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Daily push time
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Digest selection settings
    #[serde(default)]
    pub digest: DigestConfig,

    /// Outbound delivery settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Who receives the daily push
    #[serde(default)]
    pub recipients: RecipientsConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Title filtering rules
    #[serde(default)]
    pub cleaning: CleaningConfig,

    /// News sources, in declaration order
    #[serde(default = "defaults::default_sources")]
    pub sources: Vec<SourceDescriptor>,

    /// Keyword auto-replies, first match wins
    #[serde(default = "defaults::default_auto_replies")]
    pub auto_replies: Vec<AutoReply>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup.
    ///
    /// Recognised keys: `ADMIN_WECHAT_ID` (alias `ADMIN_ID`), `TARGET_USERS` (comma
    /// separated), `PUSH_HOUR`, `PUSH_MINUTE`, `NEWS_COUNT`, `LOG_LEVEL` and `ENABLE_<SOURCE_ID>`.
    /// Unparseable numbers are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(admin) = lookup("ADMIN_WECHAT_ID").or_else(|| lookup("ADMIN_ID")) {
            self.recipients.admin = admin.trim().to_string();
        }
        if let Some(targets) = lookup("TARGET_USERS") {
            self.recipients.targets = targets
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(hour) = parse_override(&lookup, "PUSH_HOUR") {
            self.schedule.hour = hour;
        }
        if let Some(minute) = parse_override(&lookup, "PUSH_MINUTE") {
            self.schedule.minute = minute;
        }
        if let Some(count) = parse_override(&lookup, "NEWS_COUNT") {
            self.digest.count = count;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.trim().to_string();
        }
        for source in &mut self.sources {
            let key = format!("ENABLE_{}", source.id.to_uppercase());
            if let Some(value) = lookup(&key) {
                source.enabled = value.trim() != "false";
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.source_timeout_secs == 0 {
            return Err(AppError::validation("http.source_timeout_secs must be > 0"));
        }
        if self.schedule.hour > 23 {
            return Err(AppError::validation("schedule.hour must be in 0..=23"));
        }
        if self.schedule.minute > 59 {
            return Err(AppError::validation("schedule.minute must be in 0..=59"));
        }
        if self.digest.count == 0 {
            return Err(AppError::validation("digest.count must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        if !self.sources.iter().any(|s| s.mandatory) {
            log::warn!("No mandatory source defined; a run may fetch nothing");
        }

        let mut ids = HashSet::new();
        for source in &self.sources {
            if !ids.insert(source.id.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate source id '{}'",
                    source.id
                )));
            }
            validate_source(source)?;
        }

        if self.auto_replies.iter().any(|r| r.keyword.is_empty()) {
            return Err(AppError::validation("auto_replies contains an empty keyword"));
        }
        Ok(())
    }

    /// Recipients of the daily push: admin first, then the targets.
    pub fn recipient_list(&self) -> RecipientList {
        RecipientList::new(Some(self.recipients.admin.as_str()), &self.recipients.targets)
    }

    /// Sources that take part in a run, in declaration order.
    pub fn active_sources(&self) -> Vec<SourceDescriptor> {
        self.sources
            .iter()
            .filter(|s| s.is_active())
            .cloned()
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            schedule: ScheduleConfig::default(),
            digest: DigestConfig::default(),
            dispatch: DispatchConfig::default(),
            recipients: RecipientsConfig::default(),
            logging: LoggingConfig::default(),
            cleaning: CleaningConfig::default(),
            sources: defaults::default_sources(),
            auto_replies: defaults::default_auto_replies(),
        }
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

fn validate_source(source: &SourceDescriptor) -> Result<()> {
    if source.id.trim().is_empty() {
        return Err(AppError::validation("Source with empty id"));
    }
    if source.urls.is_empty() {
        return Err(AppError::validation(format!(
            "Source '{}' has no urls",
            source.id
        )));
    }
    if source.quota == 0 || source.page_limit == 0 {
        return Err(AppError::validation(format!(
            "Source '{}' must have quota and page_limit > 0",
            source.id
        )));
    }

    url::Url::parse(&source.base_url)?;
    for url in &source.urls {
        url::Url::parse(url)?;
    }

    let selectors = &source.selectors;
    let mut all = vec![&selectors.row_selector, &selectors.title_selector];
    all.extend(selectors.date_selector.as_ref());
    for s in all {
        Selector::parse(s).map_err(|e| AppError::selector(s.as_str(), format!("{e:?}")))?;
    }
    Ok(())
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Accept-Language header
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Overall budget for one source in seconds
    #[serde(default = "defaults::source_timeout")]
    pub source_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            source_timeout_secs: defaults::source_timeout(),
        }
    }
}

/// Local time of the daily push.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "defaults::push_hour")]
    pub hour: u32,

    #[serde(default)]
    pub minute: u32,
}

impl ScheduleConfig {
    /// Push time as `H:MM`.
    pub fn label(&self) -> String {
        format!("{}:{:02}", self.hour, self.minute)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: defaults::push_hour(),
            minute: 0,
        }
    }
}

/// Digest selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Number of items per digest
    #[serde(default = "defaults::news_count")]
    pub count: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            count: defaults::news_count(),
        }
    }
}

/// Outbound delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Delay between consecutive recipient sends in milliseconds
    #[serde(default = "defaults::pacing")]
    pub pacing_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pacing_ms: defaults::pacing(),
        }
    }
}

/// Push recipients.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecipientsConfig {
    /// Administrator id, receives the startup notice and the push
    #[serde(default)]
    pub admin: String,

    /// Additional recipient ids
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Title filtering rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Titles containing any of these tokens are navigation noise
    #[serde(default = "defaults::noise_tokens")]
    pub noise_tokens: Vec<String>,

    /// Titles with fewer characters are dropped
    #[serde(default = "defaults::min_title_chars")]
    pub min_title_chars: usize,
}

impl CleaningConfig {
    /// Clean a raw title string.
    pub fn clean_title(&self, text: &str) -> String {
        normalize_whitespace(text)
    }

    /// Whether a cleaned title should be kept.
    pub fn accepts(&self, title: &str) -> bool {
        !title.is_empty()
            && title.chars().count() >= self.min_title_chars
            && !self.noise_tokens.iter().any(|t| title.contains(t.as_str()))
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            noise_tokens: defaults::noise_tokens(),
            min_title_chars: defaults::min_title_chars(),
        }
    }
}

/// Keyword to canned reply mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoReply {
    /// Substring searched in the inbound text (case-sensitive)
    pub keyword: String,

    /// Short description shown in the help text; entries without one are not listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reply sent when the keyword matches
    pub reply: String,
}

mod defaults {
    use super::AutoReply;
    use crate::models::{SourceDescriptor, SourceSelectors};

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn accept() -> String {
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".into()
    }
    pub fn accept_language() -> String {
        "zh-CN,zh;q=0.9,en;q=0.8".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn source_timeout() -> u64 {
        30
    }

    // Schedule and digest defaults
    pub fn push_hour() -> u32 {
        9
    }
    pub fn news_count() -> usize {
        5
    }
    pub fn pacing() -> u64 {
        1000
    }
    pub fn log_level() -> String {
        "info".into()
    }

    // Cleaning defaults
    pub fn noise_tokens() -> Vec<String> {
        vec!["更多".into()]
    }
    pub fn min_title_chars() -> usize {
        6
    }

    fn source(
        id: &str,
        name: &str,
        urls: &[&str],
        base_url: &str,
        quota: usize,
        selectors: SourceSelectors,
    ) -> SourceDescriptor {
        SourceDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            base_url: base_url.to_string(),
            enabled: true,
            mandatory: false,
            quota,
            page_limit: 10,
            selectors,
        }
    }

    // Source defaults
    pub fn default_sources() -> Vec<SourceDescriptor> {
        const DATE: Option<&str> = Some("span.date, .time, .date-text, span");

        let mut backup = source(
            "backup",
            "通信世界网",
            &["http://www.cww.net.cn/news/list/22"],
            "http://www.cww.net.cn",
            10,
            SourceSelectors::from_pattern(
                "div.news_list ul li, ul.news-list li, .item, .article-item",
                DATE,
            ),
        );
        backup.mandatory = true;

        vec![
            source(
                "miit",
                "工信部",
                &[
                    "https://www.miit.gov.cn/gxsj/tjfx/txy/index.html",
                    "https://www.miit.gov.cn/gxsj/tjfx/txy/index_1.html",
                ],
                "https://www.miit.gov.cn",
                5,
                SourceSelectors::from_pattern(
                    "div.news_list ul li, div.tcyw_list ul li, div.con li, .clist li",
                    DATE,
                ),
            ),
            source(
                "unicom",
                "中国联通",
                &[
                    "https://www.10010.com/news/",
                    "https://www.10010.com/news/page/1/",
                ],
                "https://www.10010.com",
                5,
                SourceSelectors::from_pattern(
                    "div.news-list li, ul.news-list li, .news-item, .news-list-item",
                    DATE,
                ),
            ),
            source(
                "anti_fraud",
                "国家反诈中心",
                &["https://www.12381.cn/", "https://www.12381.cn/news/"],
                "https://www.12381.cn",
                10,
                SourceSelectors::from_pattern(
                    ".news-item, .article-item, .list-item, .news-list-item",
                    None,
                ),
            ),
            backup,
        ]
    }

    fn reply(keyword: &str, description: Option<&str>, reply: &str) -> AutoReply {
        AutoReply {
            keyword: keyword.to_string(),
            description: description.map(str::to_string),
            reply: reply.to_string(),
        }
    }

    const FIVE_G_REPLY: &str =
        "📶 5G是第五代移动通信技术，提供更快的速度和更低的延迟，推动物联网、智能制造等发展。";

    // Auto-reply defaults
    pub fn default_auto_replies() -> Vec<AutoReply> {
        vec![
            reply(
                "工信部",
                Some("了解工信部最新动态"),
                "📡 工信部负责工业和信息化发展，统筹推进数字中国建设，监管重点包括电信、互联网、5G发展等。",
            ),
            reply(
                "联通",
                Some("中国联通相关资讯"),
                "📱 中国联通提供移动通信、固网宽带、云计算等基础通信服务。",
            ),
            reply(
                "反诈",
                Some("反诈防骗提示"),
                "🛡️ 国家反诈中心提示：警惕冒充公检法、虚假投资、刷单返利等诈骗手段。如遇诈骗请拨打96110。",
            ),
            reply("5G", Some("5G相关资讯"), FIVE_G_REPLY),
            reply("5g", None, FIVE_G_REPLY),
            reply(
                "运营商",
                None,
                "📡 中国电信运营商包括中国移动、中国联通、中国电信、中国广电。",
            ),
            reply(
                "诈骗",
                None,
                "🛡️ 防范诈骗：不听、不信、不转账！不点击陌生链接，不向陌生人转账。",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_schedule() {
        let mut config = Config::default();
        config.schedule.hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_selector() {
        let mut config = Config::default();
        config.sources[0].selectors.row_selector = "[[invalid".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_source_ids() {
        let mut config = Config::default();
        let dup = config.sources[0].clone();
        config.sources.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_sources_keep_backup_last_and_mandatory() {
        let config = Config::default();
        let last = config.sources.last().unwrap();
        assert_eq!(last.id, "backup");
        assert!(last.mandatory);
        assert_eq!(config.digest.count, 5);
        assert_eq!(config.schedule.label(), "9:00");
    }

    #[test]
    fn overrides_apply_known_keys() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            ("ADMIN_WECHAT_ID", "boss"),
            ("TARGET_USERS", "a, b,,c"),
            ("PUSH_HOUR", "8"),
            ("PUSH_MINUTE", "30"),
            ("NEWS_COUNT", "3"),
            ("ENABLE_MIIT", "false"),
            ("ENABLE_BACKUP", "false"),
        ]));

        assert_eq!(config.recipients.admin, "boss");
        assert_eq!(config.recipients.targets, vec!["a", "b", "c"]);
        assert_eq!(config.schedule.label(), "8:30");
        assert_eq!(config.digest.count, 3);

        let active: Vec<String> = config.active_sources().into_iter().map(|s| s.id).collect();
        assert_eq!(active, vec!["unicom", "anti_fraud", "backup"]);

        let recipients = config.recipient_list();
        let ids: Vec<&str> = recipients.iter().collect();
        assert_eq!(ids, vec!["boss", "a", "b", "c"]);
    }

    #[test]
    fn admin_id_is_accepted_as_alias() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[("ADMIN_ID", "ops")]));
        assert_eq!(config.recipients.admin, "ops");

        config.apply_overrides(lookup(&[("ADMIN_WECHAT_ID", "boss"), ("ADMIN_ID", "ops")]));
        assert_eq!(config.recipients.admin, "boss");
    }

    #[test]
    fn overrides_ignore_invalid_numbers() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[("NEWS_COUNT", "many")]));
        assert_eq!(config.digest.count, 5);
    }

    #[test]
    fn cleaning_filters_short_and_noise_titles() {
        let cleaning = CleaningConfig::default();
        assert!(!cleaning.accepts(""));
        assert!(!cleaning.accepts("五个字标题"));
        assert!(cleaning.accepts("六个字的标题"));
        assert!(!cleaning.accepts("查看更多行业资讯内容"));
    }

    #[test]
    fn load_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [schedule]
            hour = 7

            [recipients]
            admin = "root"
            targets = ["x"]
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.schedule.hour, 7);
        assert_eq!(config.schedule.minute, 0);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.sources.len(), 4);
        assert_eq!(config.auto_replies.len(), 7);
        assert_eq!(config.recipient_list().len(), 2);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}

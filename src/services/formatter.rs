//! Digest rendering.

use std::fmt::Write;

use chrono::{DateTime, Datelike, TimeZone, Weekday};

use crate::models::Digest;

/// Message sent when no item survived selection.
pub const EMPTY_DIGEST_MESSAGE: &str = "今日暂无最新资讯推送";

/// First line of every non-empty digest.
pub const DIGEST_HEADER: &str = "📰 电信行业每日资讯";

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Render a digest as one chat message.
///
/// The output depends only on the digest, including the date footer which is
/// taken from `generated_at`.
pub fn format_digest(digest: &Digest) -> String {
    if digest.is_empty() {
        return EMPTY_DIGEST_MESSAGE.to_string();
    }

    let mut message = String::new();
    let _ = writeln!(message, "{DIGEST_HEADER}");
    let _ = writeln!(message, "{SEPARATOR}");
    message.push('\n');

    for (index, item) in digest.items.iter().enumerate() {
        let _ = writeln!(message, "{}. {}", index + 1, item.title());
        let _ = writeln!(
            message,
            "   📅 {} | {}",
            item.published_label(),
            item.source_name()
        );
        if !item.link().is_empty() {
            let _ = writeln!(message, "   🔗 {}", item.link());
        }
        message.push('\n');
    }

    let _ = writeln!(message, "{SEPARATOR}");
    let _ = write!(message, "📅 {}", long_date(&digest.generated_at));
    message
}

/// Chinese long date, e.g. `2024年01月05日 星期五`.
pub fn long_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let date = at.date_naive();
    format!(
        "{} {}",
        date.format("%Y年%m月%d日"),
        weekday_name(date.weekday())
    )
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::models::NewsItem;

    fn fixed_digest(items: Vec<NewsItem>) -> Digest {
        Digest::at(items, Local.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_digest_message() {
        assert_eq!(format_digest(&fixed_digest(vec![])), EMPTY_DIGEST_MESSAGE);
    }

    #[test]
    fn test_layout() {
        let digest = fixed_digest(vec![
            NewsItem::new(
                "工信部发布通信业统计公报",
                "https://www.miit.gov.cn/a.html",
                "2024-01-04",
                "工信部",
            )
            .unwrap(),
            NewsItem::new("联通发布新一代算力网络", "", "2024-01-03", "中国联通").unwrap(),
        ]);

        let expected = "📰 电信行业每日资讯\n\
            ━━━━━━━━━━━━━━━━━━━━\n\
            \n\
            1. 工信部发布通信业统计公报\n   📅 2024-01-04 | 工信部\n   🔗 https://www.miit.gov.cn/a.html\n\
            \n\
            2. 联通发布新一代算力网络\n   📅 2024-01-03 | 中国联通\n\
            \n\
            ━━━━━━━━━━━━━━━━━━━━\n\
            📅 2024年01月05日 星期五";

        assert_eq!(format_digest(&digest), expected);
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let digest = fixed_digest(vec![
            NewsItem::new("千兆光网覆盖超过5亿户家庭", "", "今天", "通信世界网").unwrap(),
        ]);
        assert_eq!(format_digest(&digest), format_digest(&digest));
    }

    #[test]
    fn test_weekday_names() {
        let sunday = Local.with_ymd_and_hms(2024, 1, 7, 12, 0, 0).unwrap();
        assert_eq!(long_date(&sunday), "2024年01月07日 星期日");
    }
}

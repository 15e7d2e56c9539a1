//! Rendering of translations, language tables and history for the terminal.
//!
//! `render_*` functions build the text so it can be tested; `display_*`
//! print it to stdout.

use chrono::{DateTime, Duration, Local, TimeZone};
use std::fmt::Write as _;

use super::Style;
use crate::history::HistoryRecord;
use crate::translation::{Language, TranslationResult, language_name};

const SNIPPET_WIDTH: usize = 60;

/// Renders a translation. Without `details` this is the translated text only.
pub fn render_translation(result: &TranslationResult, details: bool) -> String {
    let mut out = result.translated_text.clone();
    if !details {
        return out;
    }

    out.push_str("\n\n");
    let _ = writeln!(
        out,
        "{} {} ({}) -> {} ({})",
        Style::label("Languages: "),
        language_name(&result.resolved_source),
        Style::code(&result.resolved_source),
        language_name(&result.target),
        Style::code(&result.target)
    );
    if let Some(confidence) = result.confidence {
        let _ = writeln!(
            out,
            "{} {:.0}%",
            Style::label("Confidence:"),
            confidence * 100.0
        );
    }
    let _ = writeln!(
        out,
        "{} {}",
        Style::label("Provider:  "),
        Style::value(result.provider.display_name())
    );
    let _ = write!(
        out,
        "{} {}",
        Style::label("Time:      "),
        Style::secondary(format_timestamp(&result.timestamp))
    );
    out
}

pub fn display_translation(result: &TranslationResult, details: bool) {
    println!("{}", render_translation(result, details));
}

/// Renders languages as an aligned `Code | Name | Native Name` table.
pub fn render_languages(languages: &[Language]) -> String {
    let code_width = column_width(languages.iter().map(|l| l.code.as_str()), "Code");
    let name_width = column_width(languages.iter().map(|l| l.name.as_str()), "Name");

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        Style::header(format!(
            "{:<code_width$} | {:<name_width$} | Native Name",
            "Code", "Name"
        ))
    );
    let _ = writeln!(out, "{}-+-{}-+-{}", "-".repeat(code_width), "-".repeat(name_width), "-".repeat(11));
    for language in languages {
        let _ = writeln!(
            out,
            "{} | {:<name_width$} | {}",
            Style::code(format!("{:<code_width$}", language.code)),
            language.name,
            language.native_name
        );
    }
    let _ = write!(out, "\n{} languages", languages.len());
    out
}

pub fn display_languages(languages: &[Language]) {
    println!("{}", render_languages(languages));
}

/// Renders history records (already most recent first) as a numbered list.
pub fn render_history<Tz: TimeZone>(records: &[HistoryRecord], now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if records.is_empty() {
        return "No translation history.".to_string();
    }

    let number_width = records.len().to_string().len();
    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        let result = &record.result;
        let _ = writeln!(
            out,
            "{:>number_width$}. {}  {} -> {}  {}",
            index + 1,
            Style::secondary(format_timestamp_at(&result.timestamp, now)),
            Style::code(&result.resolved_source),
            Style::code(&result.target),
            Style::label(format!("[{}]", result.provider))
        );
        let _ = writeln!(
            out,
            "{:number_width$}  {}",
            "",
            truncate(&record.source_text, SNIPPET_WIDTH)
        );
        let _ = writeln!(
            out,
            "{:number_width$}  {} {}",
            "",
            Style::secondary("->"),
            Style::value(truncate(&result.translated_text, SNIPPET_WIDTH))
        );
    }
    out.trim_end().to_string()
}

pub fn display_history(records: &[HistoryRecord]) {
    println!("{}", render_history(records, &Local::now()));
}

/// Formats an RFC 3339 timestamp relative to the current local time.
pub fn format_timestamp(timestamp: &str) -> String {
    format_timestamp_at(timestamp, &Local::now())
}

/// Formats `timestamp` relative to `now`: "just now", "5 minutes ago",
/// "3 hours ago" (same day), "Yesterday at 3:45 PM", or an absolute date for
/// anything older. Unparseable timestamps are returned unchanged.
pub fn format_timestamp_at<Tz: TimeZone>(timestamp: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let time = parsed.with_timezone(&now.timezone());
    let elapsed = now.clone().signed_duration_since(time.clone());

    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        return plural(elapsed.num_minutes(), "minute");
    }

    let today = now.date_naive();
    let day = time.date_naive();
    if day == today {
        return plural(elapsed.num_hours(), "hour");
    }
    if today.pred_opt() == Some(day) {
        return format!("Yesterday at {}", time.format("%-I:%M %p"));
    }
    time.format("%b %-d, %Y at %-I:%M %p").to_string()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Collapses `text` onto one line and shortens it to `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= max_chars {
        return line;
    }
    let kept: String = line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-10T15:45:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn result(text: &str, timestamp: &str) -> TranslationResult {
        TranslationResult {
            translated_text: text.to_string(),
            resolved_source: "en".to_string(),
            target: "es".to_string(),
            confidence: Some(0.97),
            provider: ProviderKind::Google,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_format_timestamp_relative() {
        let now = now();
        assert_eq!(format_timestamp_at("2026-03-10T15:44:30Z", &now), "just now");
        assert_eq!(format_timestamp_at("2026-03-10T15:44:00Z", &now), "1 minute ago");
        assert_eq!(format_timestamp_at("2026-03-10T15:40:00Z", &now), "5 minutes ago");
        assert_eq!(format_timestamp_at("2026-03-10T12:30:00Z", &now), "3 hours ago");
    }

    #[test]
    fn test_format_timestamp_yesterday_and_older() {
        let now = now();
        assert_eq!(
            format_timestamp_at("2026-03-09T15:45:00Z", &now),
            "Yesterday at 3:45 PM"
        );
        assert_eq!(
            format_timestamp_at("2026-02-01T09:05:00Z", &now),
            "Feb 1, 2026 at 9:05 AM"
        );
    }

    #[test]
    fn test_format_timestamp_invalid_is_returned_unchanged() {
        assert_eq!(format_timestamp_at("yesterday-ish", &now()), "yesterday-ish");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(format_timestamp_at("2026-03-10T16:00:00Z", &now()), "just now");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 40), "line one line two");
        assert_eq!(truncate("abcdefghijklmnop", 10), "abcdefg...");
        assert_eq!(truncate("日本語のテキストです", 6), "日本語...");
    }

    #[test]
    fn test_render_translation_plain_is_text_only() {
        let rendered = render_translation(&result("Hola", "2026-03-10T15:44:30Z"), false);
        assert_eq!(rendered, "Hola");
    }

    #[test]
    fn test_render_translation_details() {
        let rendered = render_translation(&result("Hola", "2026-03-10T15:44:30Z"), true);
        assert!(rendered.starts_with("Hola\n\n"));
        assert!(rendered.contains("English"));
        assert!(rendered.contains("Spanish"));
        assert!(rendered.contains("97%"));
        assert!(rendered.contains("Google"));
    }

    #[test]
    fn test_render_languages_table() {
        let languages = vec![
            Language {
                code: "fr".to_string(),
                name: "French".to_string(),
                native_name: "Français".to_string(),
            },
            Language {
                code: "zh-CN".to_string(),
                name: "Chinese (Simplified)".to_string(),
                native_name: "简体中文".to_string(),
            },
        ];
        let rendered = render_languages(&languages);
        assert!(rendered.contains("Native Name"));
        assert!(rendered.contains("Français"));
        assert!(rendered.ends_with("2 languages"));
    }

    #[test]
    fn test_render_history_numbers_entries() {
        let records = vec![
            HistoryRecord::new("Hello".to_string(), result("Hola", "2026-03-10T15:40:00Z")),
            HistoryRecord::new("Goodbye".to_string(), result("Adiós", "2026-03-09T15:45:00Z")),
        ];
        let rendered = render_history(&records, &now());
        assert!(rendered.contains("1. "));
        assert!(rendered.contains("2. "));
        assert!(rendered.contains("5 minutes ago"));
        assert!(rendered.contains("Yesterday at 3:45 PM"));
        assert!(rendered.contains("Adiós"));
    }

    #[test]
    fn test_render_empty_history() {
        assert_eq!(render_history(&[], &now()), "No translation history.");
    }
}

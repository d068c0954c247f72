use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Lenient timestamp parsing for rows written by older app versions.
///
/// Accepts RFC 3339 and SQLite's `YYYY-MM-DD HH:MM:SS[.fff]` (taken as UTC).
/// Anything else is reported as `None` so the reading can be skipped later.
pub fn parse_created_at(value: Option<String>, reading_id: &str) -> Option<DateTime<Utc>> {
    let raw = value?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = parse_datetime(raw, "created_at") {
        return Some(parsed);
    }

    const SQLITE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    for format in SQLITE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    warn!("reading {reading_id} has unparsable created_at '{raw}'");
    None
}

pub fn parse_cards(value: &str, reading_id: &str) -> Vec<String> {
    serde_json::from_str(value).unwrap_or_else(|err| {
        warn!("reading {reading_id} has malformed cards_json: {err}");
        Vec::new()
    })
}

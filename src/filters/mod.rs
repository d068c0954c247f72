//! Narrowing the raw reading history before it is grouped into threads.
//!
//! Grouping always runs on the filtered subset, so changing a filter can split
//! or re-form threads.

pub mod date;

pub use date::DateFilter;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{ReadingRecord, ReadingType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadingTypeFilter {
    #[default]
    All,
    Simple,
    Intermediate,
    Advanced,
}

impl ReadingTypeFilter {
    pub fn matches(&self, reading_type: ReadingType) -> bool {
        match self {
            ReadingTypeFilter::All => true,
            ReadingTypeFilter::Simple => reading_type == ReadingType::Simple,
            ReadingTypeFilter::Intermediate => reading_type == ReadingType::Intermediate,
            ReadingTypeFilter::Advanced => reading_type == ReadingType::Advanced,
        }
    }
}

impl From<ReadingType> for ReadingTypeFilter {
    fn from(reading_type: ReadingType) -> Self {
        match reading_type {
            ReadingType::Simple => ReadingTypeFilter::Simple,
            ReadingType::Intermediate => ReadingTypeFilter::Intermediate,
            ReadingType::Advanced => ReadingTypeFilter::Advanced,
        }
    }
}

/// Active filter selection, owned by the UI and passed in on every recompute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryFilters {
    pub search: String,
    pub date: DateFilter,
    pub reading_type: ReadingTypeFilter,
}

impl HistoryFilters {
    pub fn matches(&self, record: &ReadingRecord, now: DateTime<FixedOffset>) -> bool {
        matches_search(record, &self.search)
            && self.date.matches(record.created_at, now)
            && self.reading_type.matches(record.reading_type())
    }
}

/// Apply every active filter (logical AND), keeping input order.
pub fn apply_filters(
    records: &[ReadingRecord],
    filters: &HistoryFilters,
    now: DateTime<FixedOffset>,
) -> Vec<ReadingRecord> {
    records
        .iter()
        .filter(|record| filters.matches(record, now))
        .cloned()
        .collect()
}

/// Case-insensitive substring match on the question or any card name.
fn matches_search(record: &ReadingRecord, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let in_question = record
        .question
        .as_deref()
        .is_some_and(|question| question.to_lowercase().contains(&needle));

    in_question
        || record
            .cards
            .iter()
            .any(|card| card.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
            .unwrap()
    }

    fn records() -> Vec<ReadingRecord> {
        vec![
            ReadingRecord::new("one", Some("Will I get the JOB?"), Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap())
                .with_cards(["The Star"]),
            ReadingRecord::new("two", Some("Love this week"), Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap())
                .with_cards(["The Lovers", "Two of Cups"]),
            ReadingRecord::new("three", None, Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap())
                .with_cards(["The Tower", "Death", "The Sun"]),
        ]
    }

    fn ids(records: &[ReadingRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn no_filters_keep_everything() {
        let filtered = apply_filters(&records(), &HistoryFilters::default(), now());
        assert_eq!(ids(&filtered), vec!["one", "two", "three"]);
    }

    #[test]
    fn search_matches_question_case_insensitively() {
        let filters = HistoryFilters {
            search: "job".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&records(), &filters, now())), vec!["one"]);
    }

    #[test]
    fn search_matches_card_names() {
        let filters = HistoryFilters {
            search: "  tower ".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&records(), &filters, now())), vec!["three"]);
    }

    #[test]
    fn reading_type_filter_uses_card_count() {
        let filters = HistoryFilters {
            reading_type: ReadingTypeFilter::Intermediate,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&records(), &filters, now())), vec!["two"]);

        let filters = HistoryFilters {
            reading_type: ReadingTypeFilter::Advanced,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&records(), &filters, now())), vec!["three"]);
    }

    #[test]
    fn filters_compose_with_and() {
        let filters = HistoryFilters {
            search: "the".into(),
            date: DateFilter::Custom {
                from: NaiveDate::from_ymd_opt(2025, 6, 1),
                to: None,
            },
            reading_type: ReadingTypeFilter::Simple,
        };
        assert_eq!(ids(&apply_filters(&records(), &filters, now())), vec!["one"]);
    }

    #[test]
    fn cardless_reading_is_simple() {
        let record = ReadingRecord::new("x", Some("?"), Utc::now());
        assert!(ReadingTypeFilter::Simple.matches(record.reading_type()));
    }
}

//! Reading-related data models.
//!
//! A `ReadingRecord` is one persisted divination session as handed over by the
//! record source. Everything else in the crate derives from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRecord {
    pub id: String,
    pub question: Option<String>,
    /// `None` when the stored timestamp was missing or could not be parsed.
    pub created_at: Option<DateTime<Utc>>,
    pub interpretation: Option<String>,
    #[serde(default)]
    pub cards: Vec<String>,
    pub parent_id: Option<String>,
}

impl ReadingRecord {
    pub fn new(id: impl Into<String>, question: Option<&str>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            question: question.map(str::to_string),
            created_at: Some(created_at),
            interpretation: None,
            cards: Vec::new(),
            parent_id: None,
        }
    }

    /// A reading created now, with a fresh id.
    pub fn create(input: NewReading) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question: input.question,
            created_at: Some(Utc::now()),
            interpretation: input.interpretation,
            cards: input.cards,
            parent_id: input.parent_id,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_cards<I, S>(mut self, cards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cards = cards.into_iter().map(Into::into).collect();
        self
    }

    pub fn reading_type(&self) -> ReadingType {
        ReadingType::from_card_count(self.cards.len())
    }
}

/// Input for saving a finished reading.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewReading {
    pub question: Option<String>,
    pub interpretation: Option<String>,
    pub cards: Vec<String>,
    /// Set when the reading is a follow-up to an earlier one
    pub parent_id: Option<String>,
}

/// Spread classification derived from how many cards were drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadingType {
    #[default]
    Simple,
    Intermediate,
    Advanced,
}

impl ReadingType {
    pub fn from_card_count(count: usize) -> Self {
        match count {
            2 => ReadingType::Intermediate,
            n if n >= 3 => ReadingType::Advanced,
            // 0 or 1 card
            _ => ReadingType::Simple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_type_follows_card_count() {
        assert_eq!(ReadingType::from_card_count(0), ReadingType::Simple);
        assert_eq!(ReadingType::from_card_count(1), ReadingType::Simple);
        assert_eq!(ReadingType::from_card_count(2), ReadingType::Intermediate);
        assert_eq!(ReadingType::from_card_count(3), ReadingType::Advanced);
        assert_eq!(ReadingType::from_card_count(10), ReadingType::Advanced);
        assert_eq!(ReadingType::default(), ReadingType::Simple);
    }

    #[test]
    fn create_assigns_id_and_timestamp() {
        let record = ReadingRecord::create(NewReading {
            question: Some("And tomorrow?".into()),
            parent_id: Some("root".into()),
            cards: vec!["The Moon".into(), "The Sun".into()],
            ..NewReading::default()
        });
        assert!(!record.id.is_empty());
        assert!(record.created_at.is_some());
        assert_eq!(record.parent_id.as_deref(), Some("root"));
        assert_eq!(record.reading_type(), ReadingType::Intermediate);
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = ReadingRecord::new("r1", Some("Will it rain?"), Utc::now()).with_parent("r0");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["parentId"], "r0");
        assert!(json.get("createdAt").is_some());
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::ReadingRecord;

/// A main reading plus its chronologically later follow-ups.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadGroup {
    pub key: String,
    pub main: ReadingRecord,
    pub follow_ups: Vec<ReadingRecord>,
    pub latest_activity_at: DateTime<Utc>,
    pub display_question: String,
    /// Keyed by a parent reading that is absent from the grouped readings
    pub orphaned: bool,
}

impl ThreadGroup {
    pub fn len(&self) -> usize {
        1 + self.follow_ups.len()
    }

    pub fn members(&self) -> impl Iterator<Item = &ReadingRecord> {
        std::iter::once(&self.main).chain(self.follow_ups.iter())
    }

    pub fn contains(&self, record_id: &str) -> bool {
        self.members().any(|record| record.id == record_id)
    }
}

/// Per-record failures that exclude a reading from grouping without aborting it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("reading {id} has no usable created_at timestamp")]
    MissingTimestamp { id: String },
}

impl RecordError {
    pub fn record_id(&self) -> &str {
        match self {
            RecordError::MissingTimestamp { id } => id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupingOutcome {
    pub groups: Vec<ThreadGroup>,
    pub skipped: Vec<RecordError>,
}

impl GroupingOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(ThreadGroup::len).sum()
    }
}

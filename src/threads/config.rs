use serde::{Deserialize, Serialize};

/// Configuration for thread grouping and pagination with tunable thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreadingConfig {
    /// Similarity at or above this merges regardless of time gap
    pub strong_similarity: f64,

    /// Similarity at or above this merges only inside `time_window_secs`
    pub weak_similarity: f64,

    /// Max distance between two readings for the weak similarity rule
    pub time_window_secs: i64,

    /// Two blank questions count as the same question
    pub merge_blank_questions: bool,

    /// Threads revealed initially and per load-more step
    pub page_size: usize,

    /// Visible delay before a load-more step lands
    pub load_more_delay_ms: u64,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            strong_similarity: 0.65,
            weak_similarity: 0.40,
            time_window_secs: 4 * 60 * 60,
            merge_blank_questions: true,
            page_size: 10,
            load_more_delay_ms: 300,
        }
    }
}

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::filters::{apply_filters, HistoryFilters};
use crate::models::ReadingRecord;
use crate::threads::{group_readings, order_groups, ThreadGroup, ThreadingConfig};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Threads for the whole filtered history, newest activity first.
#[derive(Debug, Clone, Default)]
pub struct ThreadedHistory {
    pub threads: Vec<ThreadGroup>,
    /// Readings that passed the filters
    pub filtered_count: usize,
    /// Filtered readings left out for an unusable timestamp
    pub skipped_count: usize,
}

/// What the history list renders.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub threads: Vec<ThreadGroup>,
    pub total_threads: usize,
    pub total_readings: usize,
    pub skipped: usize,
    pub displayed: usize,
    pub has_more: bool,
}

impl HistoryPage {
    /// Drives the "no readings found" state.
    pub fn is_empty(&self) -> bool {
        self.total_threads == 0
    }
}

/// Filter, group and order a user's readings.
pub fn build_threads(
    records: &[ReadingRecord],
    filters: &HistoryFilters,
    config: &ThreadingConfig,
    now: DateTime<FixedOffset>,
) -> ThreadedHistory {
    let filtered = apply_filters(records, filters, now);
    let outcome = group_readings(&filtered, config);

    if outcome.skipped_count() > 0 {
        log_warn!(
            "{} of {} filtered readings skipped while threading",
            outcome.skipped_count(),
            filtered.len()
        );
    }
    log::debug!(
        "threaded {} readings into {} groups",
        outcome.record_count(),
        outcome.groups.len()
    );

    ThreadedHistory {
        skipped_count: outcome.skipped_count(),
        filtered_count: filtered.len(),
        threads: order_groups(outcome.groups),
    }
}

impl ThreadedHistory {
    /// The first `displayed` threads.
    pub fn page(&self, displayed: usize) -> HistoryPage {
        let total_threads = self.threads.len();
        let visible = displayed.min(total_threads);
        HistoryPage {
            threads: self.threads[..visible].to_vec(),
            total_threads,
            total_readings: self.filtered_count,
            skipped: self.skipped_count,
            displayed: visible,
            has_more: displayed < total_threads,
        }
    }

    /// Resolve a thread key or reading id to the reading to open.
    ///
    /// A thread key opens the thread's main reading.
    pub fn resolve_activation(&self, key_or_id: &str) -> Option<&ReadingRecord> {
        if let Some(thread) = self.threads.iter().find(|thread| thread.key == key_or_id) {
            return Some(&thread.main);
        }
        self.threads
            .iter()
            .flat_map(ThreadGroup::members)
            .find(|record| record.id == key_or_id)
    }
}

/// Pure entry point: (records, filters, cursor) to the visible page.
pub fn build_history_page(
    records: &[ReadingRecord],
    filters: &HistoryFilters,
    displayed: usize,
    config: &ThreadingConfig,
    now: DateTime<FixedOffset>,
) -> HistoryPage {
    build_threads(records, filters, config, now).page(displayed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 6, 30, 12, 0, 0)
            .unwrap()
    }

    fn history(count: usize) -> Vec<ReadingRecord> {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                ReadingRecord::new(
                    format!("r{i:03}"),
                    Some(&format!("topic{i:03} unique{i:03} words{i:03}")),
                    base + Duration::hours(i as i64 * 5),
                )
            })
            .collect()
    }

    #[test]
    fn page_is_prefix_of_larger_page() {
        let records = history(35);
        let config = ThreadingConfig::default();
        let filters = HistoryFilters::default();

        let small = build_history_page(&records, &filters, 10, &config, now());
        let large = build_history_page(&records, &filters, 20, &config, now());

        assert_eq!(small.threads.len(), 10);
        assert_eq!(large.threads.len(), 20);
        assert_eq!(small.threads[..], large.threads[..10]);
        assert!(small.has_more && large.has_more);
    }

    #[test]
    fn last_page_reports_no_more() {
        let records = history(12);
        let page = build_history_page(
            &records,
            &HistoryFilters::default(),
            20,
            &ThreadingConfig::default(),
            now(),
        );
        assert_eq!(page.threads.len(), 12);
        assert_eq!(page.displayed, 12);
        assert!(!page.has_more);
    }

    #[test]
    fn empty_history_is_empty_page() {
        let page = build_history_page(
            &[],
            &HistoryFilters::default(),
            10,
            &ThreadingConfig::default(),
            now(),
        );
        assert!(page.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn activation_by_key_opens_main() {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let records = vec![
            ReadingRecord::new("a", Some("Career path?"), base),
            ReadingRecord::new("b", Some("And salary?"), base + Duration::minutes(5)).with_parent("a"),
        ];
        let threaded = build_threads(
            &records,
            &HistoryFilters::default(),
            &ThreadingConfig::default(),
            now(),
        );
        assert_eq!(threaded.resolve_activation("a").map(|r| r.id.as_str()), Some("a"));
        assert_eq!(threaded.resolve_activation("b").map(|r| r.id.as_str()), Some("b"));
        assert!(threaded.resolve_activation("zzz").is_none());
    }
}

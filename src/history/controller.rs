use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
    time::Duration,
};

use chrono::{DateTime, FixedOffset};
use tokio::{sync::Mutex, time};

use crate::filters::HistoryFilters;
use crate::models::ReadingRecord;
use crate::threads::ThreadingConfig;

use super::view::{build_threads, HistoryPage, ThreadedHistory};
use super::window::PaginationWindow;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

struct HistoryState {
    config: ThreadingConfig,
    history: ThreadedHistory,
    window: PaginationWindow,
    /// Identifies the filters and grouped readings the window was sized for
    fingerprint: Option<u64>,
    load_delay: Duration,
}

impl HistoryState {
    fn page(&self) -> HistoryPage {
        self.history.page(self.window.displayed)
    }
}

/// Owns the history list the UI is scrolling through.
///
/// Recomputes threads on every refresh and only rewinds the window when the
/// filtered result actually changed.
#[derive(Clone)]
pub struct HistoryController {
    state: Arc<Mutex<HistoryState>>,
    debug_mode: bool,
}

impl HistoryController {
    pub fn new(config: ThreadingConfig) -> Self {
        let debug_mode = std::env::var("ARCANA_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            state: Arc::new(Mutex::new(HistoryState {
                window: PaginationWindow::new(config.page_size),
                load_delay: load_delay(&config, debug_mode),
                config,
                history: ThreadedHistory::default(),
                fingerprint: None,
            })),
            debug_mode,
        }
    }

    pub async fn config(&self) -> ThreadingConfig {
        self.state.lock().await.config.clone()
    }

    /// Swap the threading config; forces a regroup on the next refresh.
    pub async fn set_config(&self, config: ThreadingConfig) {
        let mut state = self.state.lock().await;
        state.window.set_page_size(config.page_size);
        state.load_delay = load_delay(&config, self.debug_mode);
        state.config = config;
        state.fingerprint = None;
    }

    pub async fn refresh(
        &self,
        records: &[ReadingRecord],
        filters: &HistoryFilters,
        now: DateTime<FixedOffset>,
    ) -> HistoryPage {
        let mut state = self.state.lock().await;

        state.history = build_threads(records, filters, &state.config, now);
        let fingerprint = input_fingerprint(filters, &state.history);

        if state.fingerprint != Some(fingerprint) {
            let total = state.history.threads.len();
            state.window.reset(total);
            state.fingerprint = Some(fingerprint);
            log_info!(
                "history input changed: {} threads from {} readings",
                total, state.history.filtered_count
            );
        }

        state.page()
    }

    pub async fn page(&self) -> HistoryPage {
        self.state.lock().await.page()
    }

    pub async fn has_more(&self) -> bool {
        self.state.lock().await.window.has_more()
    }

    /// Reveal the next page after the visible delay.
    ///
    /// No-op while another load is pending or when everything is shown. A load
    /// that straddles a refresh with new input is dropped.
    pub async fn load_more(&self) -> HistoryPage {
        let (ticket, delay) = {
            let mut state = self.state.lock().await;
            match state.window.begin_load() {
                Some(ticket) => (ticket, state.load_delay),
                None => return state.page(),
            }
        };

        if !delay.is_zero() {
            time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        if !state.window.complete_load(ticket) {
            log::debug!("discarded load-more from a previous history input");
        }
        state.page()
    }

    /// Reading id to hand to the detail view for a thread key or reading id.
    pub async fn activate(&self, key_or_id: &str) -> Option<String> {
        let state = self.state.lock().await;
        state
            .history
            .resolve_activation(key_or_id)
            .map(|record| record.id.clone())
    }
}

fn load_delay(config: &ThreadingConfig, debug_mode: bool) -> Duration {
    if debug_mode {
        Duration::ZERO
    } else {
        Duration::from_millis(config.load_more_delay_ms)
    }
}

// Hashes what survived filtering, so relative date filters that drop
// readings as `now` moves also count as a change.
fn input_fingerprint(filters: &HistoryFilters, history: &ThreadedHistory) -> u64 {
    let mut hasher = DefaultHasher::new();
    filters.hash(&mut hasher);
    history.filtered_count.hash(&mut hasher);
    history.skipped_count.hash(&mut hasher);
    for thread in &history.threads {
        thread.key.hash(&mut hasher);
        for record in thread.members() {
            record.id.hash(&mut hasher);
            record.created_at.hash(&mut hasher);
            record.parent_id.hash(&mut hasher);
            record.question.hash(&mut hasher);
            record.cards.hash(&mut hasher);
        }
    }
    hasher.finish()
}

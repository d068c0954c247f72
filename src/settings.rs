use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::filters::ReadingTypeFilter;
use crate::threads::ThreadingConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    pub page_size: usize,
    pub load_more_delay_ms: u64,
    /// Reading type preselected when the history opens
    pub default_reading_type: ReadingTypeFilter,
}

impl Default for HistorySettings {
    fn default() -> Self {
        let threading = ThreadingConfig::default();
        Self {
            page_size: threading.page_size,
            load_more_delay_ms: threading.load_more_delay_ms,
            default_reading_type: ReadingTypeFilter::All,
        }
    }
}

impl HistorySettings {
    /// Threading config with these preferences applied on top of the defaults.
    pub fn threading_config(&self) -> ThreadingConfig {
        ThreadingConfig {
            page_size: self.page_size.max(1),
            load_more_delay_ms: self.load_more_delay_ms,
            ..ThreadingConfig::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
struct UserSettings {
    history: HistorySettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn history(&self) -> HistorySettings {
        match self.data.read() {
            Ok(guard) => guard.history.clone(),
            Err(poisoned) => poisoned.into_inner().history.clone(),
        }
    }

    pub fn update_history(&self, settings: HistorySettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        guard.history = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

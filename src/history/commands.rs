use chrono::{DateTime, FixedOffset, Local};
use tauri::State;

use crate::{
    filters::HistoryFilters,
    history::HistoryPage,
    models::{NewReading, ReadingRecord},
    settings::HistorySettings,
    AppState,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_error;

fn local_now() -> DateTime<FixedOffset> {
    Local::now().into()
}

/// Recompute the thread list for an owner. A failed fetch still resets the
/// list to empty so the UI shows "no readings found" next to the error.
#[tauri::command]
pub async fn list_reading_threads(
    state: State<'_, AppState>,
    owner_id: String,
    filters: Option<HistoryFilters>,
) -> Result<HistoryPage, String> {
    let filters = filters.unwrap_or_else(|| HistoryFilters {
        reading_type: state.settings.history().default_reading_type,
        ..HistoryFilters::default()
    });

    match state.db.list_readings_for_owner(&owner_id).await {
        Ok(records) => Ok(state.history.refresh(&records, &filters, local_now()).await),
        Err(err) => {
            log_error!("Failed to load readings for {owner_id}: {err:#}");
            state.history.refresh(&[], &filters, local_now()).await;
            Err(err.to_string())
        }
    }
}

#[tauri::command]
pub async fn load_more_threads(state: State<'_, AppState>) -> Result<HistoryPage, String> {
    Ok(state.history.load_more().await)
}

/// Resolve what the detail view should open for a tapped thread or reading.
#[tauri::command]
pub async fn activate_thread(
    state: State<'_, AppState>,
    key_or_id: String,
) -> Result<String, String> {
    state
        .history
        .activate(&key_or_id)
        .await
        .ok_or_else(|| format!("No reading found for {key_or_id}"))
}

#[tauri::command]
pub async fn get_reading(
    state: State<'_, AppState>,
    owner_id: String,
    reading_id: String,
) -> Result<Option<ReadingRecord>, String> {
    state
        .db
        .get_reading(&owner_id, &reading_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_reading(
    state: State<'_, AppState>,
    owner_id: String,
    input: NewReading,
) -> Result<ReadingRecord, String> {
    let record = ReadingRecord::create(input);
    state
        .db
        .insert_reading(&owner_id, &record)
        .await
        .map_err(|e| e.to_string())?;
    Ok(record)
}

#[tauri::command]
pub async fn delete_reading(
    state: State<'_, AppState>,
    owner_id: String,
    reading_id: String,
) -> Result<bool, String> {
    state
        .db
        .delete_reading(&owner_id, &reading_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_history_settings(state: State<'_, AppState>) -> Result<HistorySettings, String> {
    Ok(state.settings.history())
}

#[tauri::command]
pub async fn set_history_settings(
    state: State<'_, AppState>,
    settings: HistorySettings,
) -> Result<(), String> {
    state
        .settings
        .update_history(settings.clone())
        .map_err(|e| e.to_string())?;
    state.history.set_config(settings.threading_config()).await;
    Ok(())
}

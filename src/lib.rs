pub mod db;
pub mod filters;
pub mod history;
pub mod models;
pub mod settings;
pub mod threads;
pub mod utils;

pub use db::Database;
pub use filters::{DateFilter, HistoryFilters, ReadingTypeFilter};
pub use history::{build_history_page, HistoryController, HistoryPage, PaginationWindow};
pub use models::{NewReading, ReadingRecord, ReadingType};
pub use threads::{group_readings, order_groups, ThreadGroup, ThreadingConfig};

#[cfg(feature = "desktop")]
pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) history: HistoryController,
    pub(crate) settings: settings::SettingsStore,
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use history::commands::{
        activate_thread, delete_reading, get_history_settings, get_reading, list_reading_threads,
        load_more_threads, save_reading, set_history_settings,
    };
    use settings::SettingsStore;
    use tauri::Manager;

    // Initialize logging (reads RUST_LOG env var)
    utils::logging::init_logging();

    log::info!("Arcana starting up...");

    tauri::Builder::default()
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("arcana.sqlite3");
                let database = Database::new(db_path)?;

                let settings_path = app_data_dir.join("settings.json");
                let settings_store = SettingsStore::new(settings_path)?;
                let history = HistoryController::new(settings_store.history().threading_config());

                app.manage(AppState {
                    db: database,
                    history,
                    settings: settings_store,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            list_reading_threads,
            load_more_threads,
            activate_thread,
            get_reading,
            save_reading,
            delete_reading,
            get_history_settings,
            set_history_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

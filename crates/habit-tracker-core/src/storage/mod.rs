mod config;
pub mod database;
pub mod state_store;

pub use config::{Config, FeedConfig, ServiceConfig};
pub use database::Database;
pub use state_store::{
    export_file_name, export_json, normalize, storage_key, BlobStore, StateStore, STORAGE_VERSION,
};

use std::path::PathBuf;

/// Returns the data directory for config and the SQLite file.
///
/// `HABIT_TRACKER_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/habit-tracker[-dev]/`, with `-dev` chosen by
/// `HABIT_TRACKER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("HABIT_TRACKER_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABIT_TRACKER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("habit-tracker-dev")
            } else {
                base_dir.join("habit-tracker")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

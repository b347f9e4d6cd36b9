pub mod auth;
pub mod check;
pub mod config;
pub mod feed;
pub mod habit;
pub mod stats;
pub mod tracker;

use habit_tracker_core::identity::load_session;
use habit_tracker_core::{Database, Tracker};
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

const LOCAL_USER: &str = "local";

/// Open the tracker for `user`, falling back to the logged-in user.
pub fn open_tracker(user: Option<String>) -> Result<Tracker<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let user = match user {
        Some(user) if !user.trim().is_empty() => user.trim().to_string(),
        _ => load_session(&db)
            .map(|s| s.user.id)
            .unwrap_or_else(|| LOCAL_USER.to_string()),
    };
    debug!(%user, "opening tracker");
    Ok(Tracker::open(db, user)?)
}

/// Apply an optional `--date` to the tracker's selection.
pub fn select(tracker: &mut Tracker<Database>, date: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(date) = date {
        tracker.select_date(date)?;
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Load and save the per-user application state as one JSON blob.
//!
//! Blobs live under `habitTracker:{user_id}:{version}`. Bumping
//! [`STORAGE_VERSION`] moves to a fresh key namespace instead of migrating
//! old blobs in place. Missing or unparsable blobs load as the default
//! state. A failing backend is an error: loading defaults there would let
//! the next save overwrite the real blob.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::database::Database;
use crate::date::parse_strict;
use crate::error::{DatabaseError, Result};
use crate::habit::Habit;
use crate::state::{AppState, CheckSet, DEFAULT_WINDOW_DAYS};

pub const STORAGE_VERSION: &str = "v1";

/// Minimal string key-value backend.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn put(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
    fn remove(&self, key: &str) -> Result<(), DatabaseError>;
}

impl BlobStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.kv_get(key)?)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        Ok(self.kv_set(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        Ok(self.kv_delete(key)?)
    }
}

impl<B: BlobStore + ?Sized> BlobStore for &B {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        (**self).remove(key)
    }
}

/// Versioned storage key for a user's state blob.
pub fn storage_key(user_id: &str) -> String {
    format!("habitTracker:{user_id}:{STORAGE_VERSION}")
}

/// File name offered for a state export.
pub fn export_file_name(user_id: &str) -> String {
    format!("habit-tracker-{user_id}.json")
}

/// Pretty JSON dump of the persistence blob.
pub fn export_json(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Rebuild a state from an arbitrary JSON value, field by field.
///
/// - `habits`: must be an array; entries that are not habit records are dropped.
/// - `checks`: must be an object; keys must be canonical `YYYY-MM-DD`, each
///   value an object, and only boolean entries are kept.
/// - `chartWindowDays`: must be a number; fractions are truncated.
pub fn normalize(raw: Value) -> AppState {
    let Value::Object(mut root) = raw else {
        return AppState::default();
    };

    let habits = match root.remove("habits") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Habit>(item) {
                Ok(habit) => Some(habit),
                Err(e) => {
                    warn!(error = %e, "dropping unreadable habit record");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    let checks = match root.remove("checks") {
        Some(Value::Object(days)) => days
            .into_iter()
            .filter_map(|(key, set)| {
                let day = parse_strict(&key)?;
                let Value::Object(entries) = set else {
                    return None;
                };
                let set: CheckSet = entries
                    .into_iter()
                    .filter_map(|(habit_id, done)| done.as_bool().map(|b| (habit_id, b)))
                    .collect();
                Some((day, set))
            })
            .collect(),
        _ => BTreeMap::new(),
    };

    let chart_window_days = root
        .get("chartWindowDays")
        .and_then(Value::as_f64)
        .map(|n| n.trunc() as i64)
        .unwrap_or(DEFAULT_WINDOW_DAYS);

    AppState {
        habits,
        checks,
        chart_window_days,
    }
}

/// Per-user state persistence over a [`BlobStore`].
pub struct StateStore<B> {
    backend: B,
}

impl<B: BlobStore> StateStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stored state for `user_id`, or the default state when nothing
    /// usable is stored.
    ///
    /// # Errors
    /// Returns an error if the backend read itself fails.
    pub fn load(&self, user_id: &str) -> Result<AppState, DatabaseError> {
        let key = storage_key(user_id);
        let Some(raw) = self.backend.get(&key)? else {
            debug!(%key, "no stored state, starting fresh");
            return Ok(AppState::default());
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(normalize(value)),
            Err(e) => {
                warn!(%key, error = %e, "stored state is not JSON, starting fresh");
                Ok(AppState::default())
            }
        }
    }

    /// Write the whole state for `user_id`.
    pub fn save(&self, user_id: &str, state: &AppState) -> Result<()> {
        let key = storage_key(user_id);
        let blob = serde_json::to_string(state)?;
        self.backend.put(&key, &blob)?;
        info!(
            %key,
            habits = state.habits.len(),
            days = state.checks.len(),
            "state saved"
        );
        Ok(())
    }
}

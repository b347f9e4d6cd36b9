//! Application state and the per-day completion model.
//!
//! The whole state is one value owned per user: habits in insertion order,
//! one check set per calendar day, and the chart window length. It is the
//! unit of persistence; see [`crate::storage::StateStore`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::habit::{is_habit_active_on_date, Habit};

/// Habit id -> done. A missing entry means not done.
pub type CheckSet = BTreeMap<String, bool>;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

static EMPTY_CHECKS: CheckSet = BTreeMap::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub habits: Vec<Habit>,
    pub checks: BTreeMap<NaiveDate, CheckSet>,
    pub chart_window_days: i64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            checks: BTreeMap::new(),
            chart_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Completion figures for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub done: usize,
    pub total: usize,
    /// `done / total * 100`, or exactly `0.0` when no habit is active.
    pub rate: f64,
}

impl AppState {
    /// Habits active on `day`, in insertion order.
    pub fn active_habits_for_date(&self, day: NaiveDate) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|h| is_habit_active_on_date(h, day))
            .collect()
    }

    /// Check set for `day`; an empty set when the day was never touched.
    pub fn checks_for_date(&self, day: NaiveDate) -> &CheckSet {
        self.checks.get(&day).unwrap_or(&EMPTY_CHECKS)
    }

    /// Check set for `day`, inserting an empty one if absent.
    ///
    /// Only mutating paths call this, so reads never grow the state.
    pub fn ensure_checks_for_date(&mut self, day: NaiveDate) -> &mut CheckSet {
        self.checks.entry(day).or_default()
    }

    pub fn completion_for_date(&self, day: NaiveDate) -> Completion {
        let active = self.active_habits_for_date(day);
        let checks = self.checks_for_date(day);

        let done = active
            .iter()
            .filter(|h| checks.get(&h.id).copied() == Some(true))
            .count();
        let total = active.len();
        // No active habits reads as 0%, not "no data".
        let rate = if total == 0 {
            0.0
        } else {
            done as f64 / total as f64 * 100.0
        };

        Completion { done, total, rate }
    }

    /// Names of habits active and checked on `day`.
    pub fn habits_done_on(&self, day: NaiveDate) -> Vec<String> {
        let checks = self.checks_for_date(day);
        self.active_habits_for_date(day)
            .into_iter()
            .filter(|h| checks.get(&h.id).copied() == Some(true))
            .map(|h| h.name.clone())
            .collect()
    }

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Append a habit created on `today`. The name is trimmed first.
    pub fn add_habit(&mut self, name: &str, today: NaiveDate) -> Result<&Habit, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyHabitName);
        }
        self.habits.push(Habit::new(name, today));
        let index = self.habits.len() - 1;
        Ok(&self.habits[index])
    }

    /// Soft-delete: the habit stops counting from `today` on.
    ///
    /// Its check on `selected` is dropped; earlier days keep their checks.
    /// A habit that already has an end date keeps it.
    pub fn delete_habit(
        &mut self,
        id: &str,
        today: NaiveDate,
        selected: NaiveDate,
    ) -> Result<(), ValidationError> {
        let habit = self
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| ValidationError::UnknownHabit(id.to_string()))?;

        if habit.deleted_at.is_none() {
            habit.deleted_at = Some(today);
        }

        if let Some(checks) = self.checks.get_mut(&selected) {
            checks.remove(id);
        }
        Ok(())
    }

    /// Flip the check for `habit_id` on `day`. Returns the new value.
    pub fn toggle_check(&mut self, day: NaiveDate, habit_id: &str) -> bool {
        let checks = self.ensure_checks_for_date(day);
        let done = checks.get(habit_id).copied().unwrap_or(false);
        checks.insert(habit_id.to_string(), !done);
        !done
    }

    /// Replace everything with defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_window_days(&mut self, days: i64) {
        self.chart_window_days = crate::series::clamp_window(days);
    }
}

//! Tracker: one user's state plus the selected day.
//!
//! This is what a front end drives. Every mutating call writes the whole
//! state back through the [`StateStore`] before returning.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::date;
use crate::error::{Result, ValidationError};
use crate::feed::DailySummary;
use crate::habit::{is_habit_active_on_date, Habit};
use crate::series::{build_series, SeriesPoint};
use crate::state::{AppState, Completion};
use crate::storage::{self, BlobStore, StateStore};

/// One row of the day view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitRow {
    pub id: String,
    pub name: String,
    pub done: bool,
}

/// Everything shown for the selected day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub habits: Vec<HabitRow>,
    pub completion: Completion,
}

pub struct Tracker<B: BlobStore> {
    store: StateStore<B>,
    user_id: String,
    state: AppState,
    selected: NaiveDate,
    clock: fn() -> NaiveDate,
}

impl<B: BlobStore> Tracker<B> {
    /// Load `user_id`'s state with today selected.
    ///
    /// # Errors
    /// Fails when the backend cannot be read, so a later save never
    /// replaces stored history with an empty state.
    pub fn open(backend: B, user_id: impl Into<String>) -> Result<Self> {
        Self::with_clock(backend, user_id, date::today)
    }

    /// Like [`Tracker::open`], with a custom notion of "today".
    pub fn with_clock(
        backend: B,
        user_id: impl Into<String>,
        clock: fn() -> NaiveDate,
    ) -> Result<Self> {
        let store = StateStore::new(backend);
        let user_id = user_id.into();
        let state = store.load(&user_id)?;
        Ok(Self {
            store,
            user_id,
            state,
            selected: clock(),
            clock,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Select a day from `YYYY-MM-DD` input. Out-of-range parts roll over.
    pub fn select_date(&mut self, input: &str) -> Result<NaiveDate> {
        let day = date::from_iso_date(input.trim())
            .valid()
            .ok_or_else(|| ValidationError::InvalidDate(input.to_string()))?;
        self.selected = day;
        Ok(day)
    }

    pub fn select_today(&mut self) -> NaiveDate {
        self.selected = self.today();
        self.selected
    }

    pub fn add_habit(&mut self, name: &str) -> Result<Habit> {
        let today = self.today();
        let habit = self.state.add_habit(name, today)?.clone();
        debug!(id = %habit.id, "habit added");
        self.persist()?;
        Ok(habit)
    }

    pub fn delete_habit(&mut self, id: &str) -> Result<()> {
        let today = self.today();
        self.state.delete_habit(id, today, self.selected)?;
        debug!(%id, "habit deleted");
        self.persist()
    }

    /// Flip a habit's check on the selected day. Returns the new value.
    ///
    /// Only habits active on that day can be toggled.
    pub fn toggle_check(&mut self, id: &str) -> Result<bool> {
        let habit = self
            .state
            .habit(id)
            .ok_or_else(|| ValidationError::UnknownHabit(id.to_string()))?;
        if !is_habit_active_on_date(habit, self.selected) {
            return Err(ValidationError::HabitNotActive {
                id: id.to_string(),
                date: self.selected,
            }
            .into());
        }
        let done = self.state.toggle_check(self.selected, id);
        self.persist()?;
        Ok(done)
    }

    /// Wipe the user's state and go back to today.
    pub fn reset(&mut self) -> Result<()> {
        self.state.reset();
        self.select_today();
        self.persist()
    }

    /// Returns the clamped window actually stored.
    pub fn set_window_days(&mut self, days: i64) -> Result<i64> {
        self.state.set_window_days(days);
        self.persist()?;
        Ok(self.state.chart_window_days)
    }

    pub fn day_view(&self) -> DayView {
        let day = self.selected;
        let checks = self.state.checks_for_date(day);
        let habits = self
            .state
            .active_habits_for_date(day)
            .into_iter()
            .map(|h| HabitRow {
                id: h.id.clone(),
                name: h.name.clone(),
                done: checks.get(&h.id).copied().unwrap_or(false),
            })
            .collect();

        DayView {
            date: day,
            weekday: day.weekday(),
            habits,
            completion: self.state.completion_for_date(day),
        }
    }

    /// Completion series ending on the selected day.
    pub fn series(&self) -> Vec<SeriesPoint> {
        build_series(&self.state, self.selected, self.state.chart_window_days)
    }

    pub fn export_json(&self) -> Result<String> {
        storage::export_json(&self.state)
    }

    pub fn export_file_name(&self) -> String {
        storage::export_file_name(&self.user_id)
    }

    /// Summary for publishing. Only today's numbers may be shared.
    pub fn daily_summary(&self, display_name: &str, share_habits: bool) -> Result<DailySummary> {
        if self.selected != self.today() {
            return Err(ValidationError::PublishNotToday.into());
        }
        Ok(DailySummary::from_state(
            &self.state,
            &self.user_id,
            display_name,
            self.selected,
            share_habits,
        ))
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.user_id, &self.state)
    }
}

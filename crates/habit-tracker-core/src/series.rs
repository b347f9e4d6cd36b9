//! Rolling completion-rate series for charting.
//!
//! The series is recomputed from scratch on every call; nothing is cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{clamp, shift};
use crate::state::AppState;

pub const MIN_WINDOW_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 120;

/// One chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

pub fn clamp_window(days: i64) -> i64 {
    clamp(days, MIN_WINDOW_DAYS, MAX_WINDOW_DAYS)
}

/// Completion rate for each of the `window_days` days ending at `end`,
/// oldest first. The window is clamped to `[7, 120]`.
///
/// Days that would fall outside the representable calendar are skipped.
pub fn build_series(state: &AppState, end: NaiveDate, window_days: i64) -> Vec<SeriesPoint> {
    let window = clamp_window(window_days);

    (0..window)
        .rev()
        .filter_map(|back| shift(end, -back))
        .map(|date| SeriesPoint {
            date,
            rate: state.completion_for_date(date).rate,
        })
        .collect()
}

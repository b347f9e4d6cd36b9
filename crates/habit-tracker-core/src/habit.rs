//! Habit records and their activity interval.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Half-open activity interval `[start, end)`.
///
/// `end == None` means the habit is still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifespan {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl Lifespan {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && self.end.map_or(true, |end| end > day)
    }
}

/// A tracked habit. Never removed from the state; deletion sets `deleted_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// First day the habit counts toward completion.
    pub created_at: NaiveDate,
    /// First day the habit no longer counts (exclusive end).
    #[serde(default)]
    pub deleted_at: Option<NaiveDate>,
}

impl Habit {
    /// Create a habit starting on `today` with a fresh id.
    pub fn new(name: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id: new_habit_id(),
            name: name.into(),
            created_at: today,
            deleted_at: None,
        }
    }

    pub fn lifespan(&self) -> Lifespan {
        Lifespan {
            start: self.created_at,
            end: self.deleted_at,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Whether `habit` counts toward completion on `day`.
pub fn is_habit_active_on_date(habit: &Habit, day: NaiveDate) -> bool {
    habit.lifespan().contains(day)
}

/// Random component plus a millisecond timestamp, both hex.
///
/// Unique enough for one user's habit list; not a security token.
pub fn new_habit_id() -> String {
    let random: u64 = rand::random();
    format!("{random:x}-{:x}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(created: NaiveDate, deleted: Option<NaiveDate>) -> Habit {
        Habit {
            id: "h1".into(),
            name: "Run".into(),
            created_at: created,
            deleted_at: deleted,
        }
    }

    #[test]
    fn active_from_creation_day() {
        let h = habit(ymd(2024, 1, 1), None);
        assert!(!is_habit_active_on_date(&h, ymd(2023, 12, 31)));
        assert!(is_habit_active_on_date(&h, ymd(2024, 1, 1)));
        assert!(is_habit_active_on_date(&h, ymd(2030, 6, 1)));
    }

    #[test]
    fn deletion_day_is_exclusive() {
        let h = habit(ymd(2024, 1, 1), Some(ymd(2024, 2, 1)));
        assert!(is_habit_active_on_date(&h, ymd(2024, 1, 31)));
        assert!(!is_habit_active_on_date(&h, ymd(2024, 2, 1)));
    }

    #[test]
    fn created_and_deleted_same_day_is_never_active() {
        let h = habit(ymd(2024, 5, 5), Some(ymd(2024, 5, 5)));
        assert!(!is_habit_active_on_date(&h, ymd(2024, 5, 5)));
    }

    #[test]
    fn ids_do_not_repeat() {
        let ids: HashSet<String> = (0..500).map(|_| new_habit_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn serializes_with_camel_case_and_null_deletion() {
        let h = habit(ymd(2024, 1, 1), None);
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["createdAt"], "2024-01-01");
        assert!(json["deletedAt"].is_null());
    }

    #[test]
    fn missing_deleted_at_reads_as_active() {
        let h: Habit =
            serde_json::from_str(r#"{"id":"a","name":"Read","createdAt":"2024-01-01"}"#).unwrap();
        assert_eq!(h.deleted_at, None);
    }

    fn day_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|n| ymd(2020, 1, 1) + chrono::Duration::days(n))
    }

    proptest! {
        #[test]
        fn activity_matches_interval_rule(
            created in day_strategy(),
            deleted in proptest::option::of(day_strategy()),
            day in day_strategy(),
        ) {
            let h = habit(created, deleted);
            let expected = created <= day && deleted.map_or(true, |d| d > day);
            prop_assert_eq!(is_habit_active_on_date(&h, day), expected);
        }
    }
}

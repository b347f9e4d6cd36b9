//! Integration tests for the tracker over an on-disk database.

use chrono::NaiveDate;
use habit_tracker_core::storage::{storage_key, Database, StateStore};
use habit_tracker_core::{BlobStore, Tracker};
use tempfile::TempDir;

fn day_one() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day_three() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
}

#[test]
fn test_state_survives_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("habits.db");

    let habit_id = {
        let db = Database::open_at(&path).unwrap();
        let mut tracker = Tracker::with_clock(&db, "alice", day_one).unwrap();
        let habit = tracker.add_habit("Meditate").unwrap();
        tracker.toggle_check(&habit.id).unwrap();
        habit.id
    };

    let db = Database::open_at(&path).unwrap();
    let tracker = Tracker::with_clock(&db, "alice", day_one).unwrap();
    let view = tracker.day_view();
    assert_eq!(view.habits.len(), 1);
    assert_eq!(view.habits[0].id, habit_id);
    assert!(view.habits[0].done);
}

#[test]
fn test_deleted_habit_keeps_history() {
    let db = Database::open_in_memory().unwrap();
    let mut tracker = Tracker::with_clock(&db, "alice", day_one).unwrap();
    let habit = tracker.add_habit("Run").unwrap();
    tracker.toggle_check(&habit.id).unwrap();

    let mut later = Tracker::with_clock(&db, "alice", day_three).unwrap();
    later.delete_habit(&habit.id).unwrap();
    assert!(later.day_view().habits.is_empty());

    later.select_date("2024-01-01").unwrap();
    let view = later.day_view();
    assert_eq!(view.habits.len(), 1);
    assert!(view.habits[0].done);
    assert_eq!(view.completion.rate, 100.0);
}

#[test]
fn test_damaged_blob_is_normalized_on_open() {
    let db = Database::open_in_memory().unwrap();
    db.put(
        &storage_key("alice"),
        r#"{"habits":[{"id":"h","name":"Run","createdAt":"2024-01-01"},{"bad":1}],
            "checks":{"2024-01-01":{"h":true,"x":"yes"},"junk":{}},
            "chartWindowDays":3}"#,
    )
    .unwrap();

    let tracker = Tracker::with_clock(&db, "alice", day_one).unwrap();
    assert_eq!(tracker.state().habits.len(), 1);
    assert_eq!(tracker.state().checks.len(), 1);
    assert_eq!(tracker.series().len(), 7);
    assert_eq!(tracker.day_view().completion.rate, 100.0);

    let store = StateStore::new(&db);
    assert_eq!(&store.load("alice").unwrap(), tracker.state());
}

use clap::Subcommand;
use serde_json::json;

use super::{open_tracker, print_json, select, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit starting today
    Add {
        /// Habit name
        name: String,
    },
    /// List habits active on a day
    List {
        /// Day to list (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Include deleted habits and ignore the day
        #[arg(long)]
        all: bool,
    },
    /// Stop tracking a habit from today on
    Delete {
        /// Habit ID
        id: String,
        /// Day whose check is dropped (default today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(user: Option<String>, action: HabitAction) -> CmdResult {
    let mut tracker = open_tracker(user)?;
    match action {
        HabitAction::Add { name } => {
            let habit = tracker.add_habit(&name)?;
            print_json(&habit)?;
        }
        HabitAction::List { date, all } => {
            if all {
                print_json(&tracker.state().habits)?;
            } else {
                select(&mut tracker, date.as_deref())?;
                let day = tracker.selected_date();
                print_json(&tracker.state().active_habits_for_date(day))?;
            }
        }
        HabitAction::Delete { id, date } => {
            select(&mut tracker, date.as_deref())?;
            tracker.delete_habit(&id)?;
            print_json(&json!({ "deleted": id }))?;
        }
    }
    Ok(())
}

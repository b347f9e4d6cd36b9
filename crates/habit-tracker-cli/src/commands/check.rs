use clap::Subcommand;
use serde_json::json;

use super::{open_tracker, print_json, select, CmdResult};

#[derive(Subcommand)]
pub enum CheckAction {
    /// Flip a habit's check for a day
    Toggle {
        /// Habit ID
        id: String,
        /// Day to toggle (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the day view: active habits and their checks
    Show {
        /// Day to show (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(user: Option<String>, action: CheckAction) -> CmdResult {
    let mut tracker = open_tracker(user)?;
    match action {
        CheckAction::Toggle { id, date } => {
            select(&mut tracker, date.as_deref())?;
            let done = tracker.toggle_check(&id)?;
            print_json(&json!({
                "habitId": id,
                "date": tracker.selected_date(),
                "done": done,
            }))?;
        }
        CheckAction::Show { date } => {
            select(&mut tracker, date.as_deref())?;
            print_json(&tracker.day_view())?;
        }
    }
    Ok(())
}

use std::path::PathBuf;

use habit_tracker_core::ValidationError;
use serde_json::json;

use super::{open_tracker, print_json, CmdResult};

pub fn window(user: Option<String>, days: i64) -> CmdResult {
    let mut tracker = open_tracker(user)?;
    let stored = tracker.set_window_days(days)?;
    print_json(&json!({ "chartWindowDays": stored }))
}

pub fn reset(user: Option<String>, yes: bool) -> CmdResult {
    if !yes {
        return Err(ValidationError::InvalidValue {
            field: "yes".into(),
            message: "reset needs --yes to confirm".into(),
        }
        .into());
    }
    let mut tracker = open_tracker(user)?;
    tracker.reset()?;
    println!("tracker reset for {}", tracker.user_id());
    Ok(())
}

pub fn export(user: Option<String>, output: Option<PathBuf>) -> CmdResult {
    let tracker = open_tracker(user)?;
    let json = tracker.export_json()?;
    match output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(tracker.export_file_name())
            } else {
                path
            };
            std::fs::write(&path, json)?;
            println!("exported to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

use clap::Subcommand;
use habit_tracker_core::feed::{load_feed, publish_daily_summary};
use habit_tracker_core::identity::{load_session, User};
use habit_tracker_core::{Config, Database, FeedClient, ServiceClient, ServiceError, Tracker};
use serde_json::json;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum FeedAction {
    /// Publish today's completion for the logged-in user
    Publish {
        /// Display name (default: account name; blank shows as "Someone")
        #[arg(long)]
        name: Option<String>,
        /// Include names of checked habits
        #[arg(long)]
        share_habits: bool,
    },
    /// Show recent posts, newest first
    List {
        /// Number of posts (default from config)
        #[arg(long)]
        limit: Option<u32>,
    },
}

/// Name to publish under. The account email is never used: posts are
/// readable by every logged-in user.
fn display_name(flag: Option<String>, user: &User) -> String {
    flag.unwrap_or_else(|| user.name.trim().to_string())
}

pub fn run(action: FeedAction) -> CmdResult {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(action))
}

async fn run_async(action: FeedAction) -> CmdResult {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let session = load_session(&db).ok_or(ServiceError::NotAuthenticated)?;
    let client = ServiceClient::new(&config.service)?.with_session(Some(session.secret.clone()));
    let feed = FeedClient::new(client, &config.service);

    match action {
        FeedAction::Publish { name, share_habits } => {
            let tracker = Tracker::open(&db, session.user.id.clone())?;
            let display_name = display_name(name, &session.user);
            let share = share_habits || config.feed.share_habits;
            let summary = tracker.daily_summary(&display_name, share)?;
            let post = publish_daily_summary(&feed, &summary).await?;
            print_json(&post)?;
        }
        FeedAction::List { limit } => {
            let posts = load_feed(&feed, limit.unwrap_or(config.feed.limit)).await?;
            let rows: Vec<_> = posts
                .iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "displayName": p.display_name_or_default(),
                        "date": p.date,
                        "done": p.done,
                        "total": p.total,
                        "rate": p.rate,
                        "habitsDone": p.visible_habits(),
                    })
                })
                .collect();
            print_json(&rows)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use habit_tracker_core::{AppState, DailySummary};

    fn unnamed() -> User {
        User {
            id: "u1".into(),
            name: String::new(),
            email: "ann@example.com".into(),
        }
    }

    #[test]
    fn unnamed_account_publishes_blank_name() {
        let name = display_name(None, &unnamed());
        assert_eq!(name, "");

        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let summary = DailySummary::from_state(&AppState::default(), "u1", &name, day, false);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["displayName"], "");
        assert!(!json.to_string().contains("ann@example.com"));
    }

    #[test]
    fn explicit_name_wins() {
        assert_eq!(display_name(Some("Ann".into()), &unnamed()), "Ann");
    }
}

//! Shared feed of daily summaries.
//!
//! One document per user per day, keyed `{user_id}_{date}`. Publishing is
//! create-or-update, so repeating it for the same day never duplicates a
//! post. Who may read or edit a post is left to the backend's permission
//! model; we only attach the permission strings.

mod client;

pub use client::FeedClient;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::state::AppState;

/// What gets published for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub user_id: String,
    pub display_name: String,
    pub date: NaiveDate,
    pub done: usize,
    pub total: usize,
    /// Completion percentage, rounded.
    pub rate: i64,
    pub share_habits: bool,
    /// Only present when `share_habits` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits_done: Option<Vec<String>>,
}

impl DailySummary {
    pub fn from_state(
        state: &AppState,
        user_id: &str,
        display_name: &str,
        day: NaiveDate,
        share_habits: bool,
    ) -> Self {
        let completion = state.completion_for_date(day);
        Self {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            date: day,
            done: completion.done,
            total: completion.total,
            rate: completion.rate.round() as i64,
            share_habits,
            habits_done: share_habits.then(|| state.habits_done_on(day)),
        }
    }

    pub fn document_id(&self) -> String {
        document_id(&self.user_id, self.date)
    }
}

/// Deterministic document id for a user's day.
pub fn document_id(user_id: &str, day: NaiveDate) -> String {
    format!("{user_id}_{}", day.format(crate::date::ISO_FORMAT))
}

/// Any logged-in user may read; only the author may change or remove.
pub fn permissions_for(user_id: &str) -> Vec<String> {
    vec![
        r#"read("users")"#.to_string(),
        format!(r#"update("user:{user_id}")"#),
        format!(r#"delete("user:{user_id}")"#),
    ]
}

/// A published post as read back from the feed.
///
/// Fields default when missing so one odd document cannot break the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    #[serde(rename = "$id", default)]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub done: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub rate: i64,
    #[serde(default)]
    pub share_habits: bool,
    #[serde(default)]
    pub habits_done: Option<Vec<String>>,
}

impl FeedPost {
    pub fn display_name_or_default(&self) -> &str {
        match self.display_name.trim() {
            "" => "Someone",
            name => name,
        }
    }

    /// Habit names to show: only when shared and non-empty.
    pub fn visible_habits(&self) -> Option<&[String]> {
        if !self.share_habits {
            return None;
        }
        self.habits_done
            .as_deref()
            .filter(|names| !names.is_empty())
    }
}

/// Document storage behind the feed.
#[allow(async_fn_in_trait)]
pub trait FeedStore {
    /// Create; an existing id must fail with `ServiceError::Conflict`.
    async fn create_document(
        &self,
        id: &str,
        summary: &DailySummary,
        permissions: &[String],
    ) -> Result<FeedPost, ServiceError>;

    async fn update_document(
        &self,
        id: &str,
        summary: &DailySummary,
        permissions: &[String],
    ) -> Result<FeedPost, ServiceError>;

    /// Newest first.
    async fn list_documents(&self, limit: u32) -> Result<Vec<FeedPost>, ServiceError>;
}

/// Create the day's post, or update it if it already exists.
pub async fn publish_daily_summary<F: FeedStore>(
    store: &F,
    summary: &DailySummary,
) -> Result<FeedPost, ServiceError> {
    let id = summary.document_id();
    let permissions = permissions_for(&summary.user_id);

    let post = match store.create_document(&id, summary, &permissions).await {
        Err(e) if e.is_conflict() => {
            debug!(%id, "post exists, updating");
            store.update_document(&id, summary, &permissions).await?
        }
        other => other?,
    };
    info!(%id, rate = summary.rate, "summary published");
    Ok(post)
}

/// Most recent posts first.
pub async fn load_feed<F: FeedStore>(store: &F, limit: u32) -> Result<Vec<FeedPost>, ServiceError> {
    store.list_documents(limit).await
}

//! # Habit Tracker Core Library
//!
//! Core logic for a daily habit tracker: habits with an active lifespan,
//! per-day check sets, completion rates and a rolling completion series.
//! The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Model**: [`AppState`] holds habits, check sets and the chart window;
//!   completion and series are always recomputed from it
//! - **Storage**: SQLite key-value blobs per user, TOML configuration
//! - **Services**: REST clients for identity and the shared daily feed
//!
//! ## Key Components
//!
//! - [`Tracker`]: selected day plus state, persisted on every change
//! - [`StateStore`]: versioned, normalizing load/save of [`AppState`]
//! - [`Config`]: application configuration management
//! - [`FeedStore`]: create-or-update publishing of daily summaries

pub mod date;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod habit;
pub mod identity;
pub mod series;
pub mod service;
pub mod session;
pub mod state;
pub mod storage;
pub mod tracker;

pub use date::IsoDate;
pub use debounce::Debouncer;
pub use error::{ConfigError, CoreError, DatabaseError, ServiceError, ValidationError};
pub use feed::{DailySummary, FeedClient, FeedPost, FeedStore};
pub use habit::{is_habit_active_on_date, Habit, Lifespan};
pub use identity::{AccountClient, Identity, StoredSession, User};
pub use series::{build_series, SeriesPoint};
pub use service::ServiceClient;
pub use session::{AuthSurface, SessionController, SignUp};
pub use state::{AppState, CheckSet, Completion};
pub use storage::{BlobStore, Config, Database, StateStore};
pub use tracker::{DayView, HabitRow, Tracker};

//! Data models for dashboard entities.
//!
//! This module contains the data structures returned by the analytics API:
//!
//! - `DashboardStats`: aggregate counters and distribution breakdowns
//! - `UserStats`, `CurrentUser`: per-user aggregates and the caller identity
//! - `SessionRecord`, `SessionHistory`: chat sessions and their transcripts
//! - `DailyAnalytics`: the per-day activity series

pub mod analytics;
pub mod session;
pub mod stats;
pub mod user;

pub use analytics::{DailyAnalytics, DailyAnalyticsResponse};
pub use session::{
    ActiveSessionsResponse, MessageRecord, SessionHistory, SessionRecord, UserSessionsResponse,
};
pub use stats::{DashboardStats, DistributionStats, NamedCount};
pub use user::{CurrentUser, UserStats, UsersResponse};

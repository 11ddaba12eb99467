use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate dashboard counters from `/dashboard/stats`.
///
/// Rates (`retention_rate`, `bounce_rate`, `user_satisfaction_score`,
/// `error_rate`) arrive as fractions in `0..=1` and stay that way; they are
/// scaled to percentages only at render time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: i64,
    #[serde(default)]
    pub active_users_today: i64,
    #[serde(default)]
    pub active_users_week: i64,
    #[serde(default)]
    pub total_sessions: i64,
    #[serde(default)]
    pub total_messages: i64,
    #[serde(default)]
    pub avg_messages_per_session: f64,
    /// Average session length in minutes.
    #[serde(default)]
    pub avg_session_duration: f64,
    #[serde(default)]
    pub peak_usage_hour: u32,
    #[serde(default)]
    pub retention_rate: f64,
    #[serde(default)]
    pub bounce_rate: f64,
    #[serde(default)]
    pub user_satisfaction_score: f64,
    /// Average bot response time in seconds.
    #[serde(default)]
    pub response_time_avg: f64,
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub top_conversation_topics: Vec<String>,
    #[serde(default)]
    pub user_types_distribution: BTreeMap<String, i64>,
    #[serde(default)]
    pub language_distribution: BTreeMap<String, i64>,
}

/// One labeled count in an external distribution breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedCount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: i64,
}

/// Payload of the external partnership/category stats endpoints.
/// Defaults to empty when the endpoint is absent or failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionStats {
    #[serde(default)]
    pub data: Vec<NamedCount>,
}

use serde::{Deserialize, Serialize};

/// One day of the activity series from `/dashboard/analytics/daily`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAnalytics {
    pub date: String,
    #[serde(default)]
    pub new_users: i64,
    #[serde(default)]
    pub active_users: i64,
    #[serde(default)]
    pub sessions: i64,
    #[serde(default)]
    pub messages: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyAnalyticsResponse {
    #[serde(default)]
    pub daily_analytics: Vec<DailyAnalytics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_analytics_wrapper() {
        let json = r#"{"daily_analytics": [
            {"date": "2025-06-01", "new_users": 3, "active_users": 12, "sessions": 20, "messages": 150},
            {"date": "2025-06-02"}
        ]}"#;
        let parsed: DailyAnalyticsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.daily_analytics.len(), 2);
        assert_eq!(parsed.daily_analytics[0].messages, 150);
        assert_eq!(parsed.daily_analytics[1].sessions, 0);
    }
}

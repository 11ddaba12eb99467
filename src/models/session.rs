use serde::{Deserialize, Serialize};

/// One chat session, as returned by the active-session and per-user
/// session endpoints. The per-user endpoint omits `user_id`; the export
/// aggregator fills it in from the enclosing user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_active: Option<String>,
    #[serde(default)]
    pub message_count: i64,
    #[serde(default)]
    pub duration_minutes: f64,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub detected_intents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveSessionsResponse {
    #[serde(default)]
    pub active_sessions: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

/// Transcript of one session, from `/dashboard/session/{id}/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionHistory {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, alias = "history")]
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "message")]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parse_with_missing_fields() {
        let json = r#"{"session_id": "s-1"}"#;
        let session: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(session.session_id, "s-1");
        assert_eq!(session.message_count, 0);
        assert_eq!(session.duration_minutes, 0.0);
        assert!(session.detected_intents.is_empty());
    }

    #[test]
    fn test_active_sessions_wrapper() {
        let json = r#"{"active_sessions": [{"session_id": "s-1"}, {"session_id": "s-2"}]}"#;
        let parsed: ActiveSessionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.active_sessions.len(), 2);
    }

    #[test]
    fn test_history_accepts_alias_field() {
        let json = r#"{"session_id": "s-1", "history": [{"role": "user", "message": "hi"}]}"#;
        let history: SessionHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.messages.len(), 1);
        assert_eq!(history.messages[0].content.as_deref(), Some("hi"));
    }
}

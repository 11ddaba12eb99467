use serde::{Deserialize, Serialize};

/// Per-user aggregate row from `/dashboard/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub total_sessions: i64,
    #[serde(default)]
    pub total_messages: i64,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub most_common_intent: Option<String>,
    #[serde(default)]
    pub languages_used: Vec<String>,
}

impl UserStats {
    /// Admin/login accounts are excluded from exported reports.
    pub fn is_service_account(&self) -> bool {
        self.user_id.contains("admin") || self.user_id.contains("login")
    }
}

/// Wrapper shape some deployments return instead of a bare array.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<UserStats>,
}

/// Identity of the logged-in operator, from `/auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parse_with_missing_fields() {
        let json = r#"{"user_id": "u-17"}"#;
        let user: UserStats = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, "u-17");
        assert_eq!(user.total_sessions, 0);
        assert!(user.languages_used.is_empty());
        assert!(!user.is_service_account());
    }

    #[test]
    fn test_service_account_filter() {
        let admin: UserStats =
            serde_json::from_str(r#"{"user_id": "admin-primary"}"#).unwrap();
        let login: UserStats =
            serde_json::from_str(r#"{"user_id": "web-login-7"}"#).unwrap();
        assert!(admin.is_service_account());
        assert!(login.is_service_account());
    }

    #[test]
    fn test_current_user_role() {
        let user: CurrentUser =
            serde_json::from_str(r#"{"user_id": "ops", "role": "admin"}"#).unwrap();
        assert!(user.is_admin());

        let viewer: CurrentUser = serde_json::from_str(r#"{"user_id": "ops"}"#).unwrap();
        assert!(!viewer.is_admin());
    }
}

//! Typed API client for the chatbot analytics dashboard.
//!
//! Every method goes through `SessionManager::execute` (so expiry recovery
//! is transparent) and follows one contract: a validated payload comes
//! back, or a typed [`ApiError`] does. Raw responses never reach callers.

use std::sync::Arc;

use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::SessionManager;
use crate::models::{
    ActiveSessionsResponse, CurrentUser, DailyAnalytics, DailyAnalyticsResponse, DashboardStats,
    DistributionStats, SessionHistory, SessionRecord, UserSessionsResponse, UserStats,
    UsersResponse,
};

use super::ApiError;

/// One API call: method, endpoint path relative to the configured prefix,
/// optional JSON body and extra headers. Built per call, never persisted.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: header::HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: header::HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.body = Some(body);
        request
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }
}

/// Typed client over the session layer.
/// Clone is cheap - the session manager is shared behind an Arc.
#[derive(Clone)]
pub struct ApiClient {
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Aggregate dashboard counters and distributions.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/dashboard/stats").await
    }

    /// Paged user list. Some deployments return a bare array, others wrap
    /// it in `{"users": [...]}`; accept both.
    pub async fn users(&self, limit: usize, offset: usize) -> Result<Vec<UserStats>, ApiError> {
        let path = format!("/dashboard/users?limit={}&offset={}", limit, offset);
        let text = self.get_text(&path).await?;

        if let Ok(users) = serde_json::from_str::<Vec<UserStats>>(&text) {
            return Ok(users);
        }

        let wrapper: UsersResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("users response: {}", e)))?;
        Ok(wrapper.users)
    }

    /// Sessions for one user. Bare array or `{"sessions": [...]}`.
    pub async fn user_sessions(&self, user_id: &str) -> Result<Vec<SessionRecord>, ApiError> {
        let path = format!("/dashboard/user/{}/sessions", user_id);
        let text = self.get_text(&path).await?;

        if let Ok(sessions) = serde_json::from_str::<Vec<SessionRecord>>(&text) {
            return Ok(sessions);
        }

        let wrapper: UserSessionsResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("user sessions response: {}", e)))?;
        Ok(wrapper.sessions)
    }

    /// Sessions active within the trailing `hours` window.
    pub async fn active_sessions(&self, hours: u32) -> Result<Vec<SessionRecord>, ApiError> {
        let path = format!("/dashboard/sessions/active?hours={}", hours);
        let response: ActiveSessionsResponse = self.get_json(&path).await?;
        Ok(response.active_sessions)
    }

    /// Daily activity series, optionally bounded to the trailing `days`.
    pub async fn daily_analytics(
        &self,
        days: Option<u32>,
    ) -> Result<Vec<DailyAnalytics>, ApiError> {
        let path = match days {
            Some(days) => format!("/dashboard/analytics/daily?days={}", days),
            None => "/dashboard/analytics/daily".to_string(),
        };
        let response: DailyAnalyticsResponse = self.get_json(&path).await?;
        Ok(response.daily_analytics)
    }

    /// Identity of the logged-in operator.
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get_json("/auth/me").await
    }

    /// Message transcript of one session.
    pub async fn session_history(&self, session_id: &str) -> Result<SessionHistory, ApiError> {
        let path = format!("/dashboard/session/{}/history", session_id);
        self.get_json(&path).await
    }

    /// Delete a user and their data. Admin only.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("/dashboard/user/{}", user_id);
        self.delete(&path).await
    }

    /// Delete one session. Admin only.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        let path = format!("/dashboard/session/{}", session_id);
        self.delete(&path).await
    }

    /// Partnership distribution from the external stats service.
    /// Soft-fails to empty: these endpoints are optional per deployment.
    pub async fn partnership_stats(&self) -> DistributionStats {
        self.external_stats("/api/v1/partnership-stats").await
    }

    /// Content-category distribution from the external stats service.
    pub async fn category_stats(&self) -> DistributionStats {
        self.external_stats("/api/v1/category-stats").await
    }

    // ===== Request plumbing =====

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.get_text(path).await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)))
    }

    /// GET an endpoint, validate the status, and return the body text for
    /// the caller to parse (several endpoints need shape fallbacks).
    async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let request = ApiRequest::get(path);
        let response = self.session.execute(&request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        Ok(response.text().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = ApiRequest::delete(path);
        let response = self.session.execute(&request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        debug!(path = %path, "Delete succeeded");
        Ok(())
    }

    /// External endpoints carry no auth and no wrapper; any failure is
    /// logged and collapses to the empty distribution.
    async fn external_stats(&self, path: &str) -> DistributionStats {
        let Some(url) = self.session.config().external_url(path) else {
            debug!(path = %path, "No external stats base configured, skipping");
            return DistributionStats::default();
        };

        let result = self.session.http().get(&url).send().await;
        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(url = %url, status = %response.status(), "External stats fetch failed");
                return DistributionStats::default();
            }
            Err(e) => {
                warn!(url = %url, error = %e, "External stats fetch failed");
                return DistributionStats::default();
            }
        };

        match response.json().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to parse external stats");
                DistributionStats::default()
            }
        }
    }
}

//! Export data collection.
//!
//! One export invocation fans out the dashboard's read endpoints, joins
//! the results into an [`ExportBundle`], and renders it. Primary reads
//! (stats, users, active sessions, daily series) abort the export on
//! failure; secondary reads (per-user session detail, external
//! distributions) are dropped individually and logged.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{
    DailyAnalytics, DashboardStats, DistributionStats, SessionRecord, UserStats,
};

use super::{csv, excel, report, Document, ExportFormat};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of user rows pulled into an export.
const USER_EXPORT_LIMIT: usize = 1000;

/// Per-user session detail is fetched for this many users only.
const SESSION_DETAIL_USER_CAP: usize = 50;

/// Active sessions are pulled for the trailing week.
const ACTIVE_SESSION_WINDOW_HOURS: u32 = 168;

/// Length of the daily-analytics series included in exports.
const ANALYTICS_WINDOW_DAYS: u32 = 90;

/// Maximum concurrent per-user session requests.
/// Bounds the fan-out so a large user list cannot flood the server.
const MAX_CONCURRENT_REQUESTS: usize = 10;

/// Everything one export invocation serializes. Built, rendered, dropped.
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    pub stats: DashboardStats,
    pub users: Vec<UserStats>,
    pub active_sessions: Vec<SessionRecord>,
    /// Per-user session detail for the first [`SESSION_DETAIL_USER_CAP`]
    /// users; users whose fetch failed are absent.
    pub user_sessions: Vec<SessionRecord>,
    pub daily: Vec<DailyAnalytics>,
    pub partnership_stats: DistributionStats,
    pub category_stats: DistributionStats,
}

pub struct Exporter {
    client: Arc<ApiClient>,
}

impl Exporter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Collect and serialize in one step.
    pub async fn export_all(&self, format: ExportFormat) -> Result<Document, ApiError> {
        let bundle = match self.collect().await {
            Ok(bundle) => bundle,
            Err(e) => {
                error!(error = %e, "Export data collection failed");
                return Err(e);
            }
        };
        Ok(Self::render(&bundle, format))
    }

    /// Fetch every data source the export needs.
    pub async fn collect(&self) -> Result<ExportBundle, ApiError> {
        // Primary reads, issued concurrently. Any failure aborts.
        let (stats, users, active_sessions, daily) = tokio::try_join!(
            self.client.dashboard_stats(),
            self.client.users(USER_EXPORT_LIMIT, 0),
            self.client.active_sessions(ACTIVE_SESSION_WINDOW_HOURS),
            self.client.daily_analytics(Some(ANALYTICS_WINDOW_DAYS)),
        )?;

        // External distributions soft-fail to empty inside the client.
        let (partnership_stats, category_stats) =
            tokio::join!(self.client.partnership_stats(), self.client.category_stats());

        let user_sessions = self.collect_user_sessions(&users).await;

        info!(
            users = users.len(),
            active_sessions = active_sessions.len(),
            user_sessions = user_sessions.len(),
            daily = daily.len(),
            "Export bundle assembled"
        );

        Ok(ExportBundle {
            stats,
            users,
            active_sessions,
            user_sessions,
            daily,
            partnership_stats,
            category_stats,
        })
    }

    /// Serialize a bundle without refetching.
    pub fn render(bundle: &ExportBundle, format: ExportFormat) -> Document {
        let content = match format {
            ExportFormat::Csv => csv::generate(bundle),
            ExportFormat::Excel => excel::generate(bundle),
            ExportFormat::Report => report::generate(bundle),
        };
        Document::new(format, content)
    }

    /// Fetch session detail for a capped subset of users with bounded
    /// concurrency. A failed fetch drops that user from the result and
    /// never aborts the export.
    async fn collect_user_sessions(&self, users: &[UserStats]) -> Vec<SessionRecord> {
        let user_ids: Vec<String> = users
            .iter()
            .take(SESSION_DETAIL_USER_CAP)
            .map(|u| u.user_id.clone())
            .collect();

        debug!(
            count = user_ids.len(),
            "Fetching per-user sessions with max {} concurrent requests",
            MAX_CONCURRENT_REQUESTS
        );

        let per_user: Vec<Vec<SessionRecord>> = stream::iter(user_ids)
            .map(|user_id| {
                let client = Arc::clone(&self.client);
                async move {
                    match client.user_sessions(&user_id).await {
                        Ok(sessions) => sessions
                            .into_iter()
                            .map(|mut session| {
                                session.user_id = Some(user_id.clone());
                                session
                            })
                            .collect(),
                        Err(e) => {
                            warn!(user = %user_id, error = %e, "Session fetch failed, user excluded from export");
                            Vec::new()
                        }
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        per_user.into_iter().flatten().collect()
    }
}

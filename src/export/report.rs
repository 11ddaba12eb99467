//! Printable HTML report rendering of an export bundle.
//!
//! This is the "PDF" export: a self-contained HTML document the consumer
//! hands to its print pipeline. No PDF encoding happens here; the output
//! of print-to-PDF is outside this system's control.

use crate::models::DashboardStats;
use crate::utils::{escape_html, format_date, format_percent};

use super::aggregate::ExportBundle;

/// The report's user summary table is capped to keep the printout short.
const REPORT_USER_CAP: usize = 50;

/// The report shows the trailing month of the daily series.
const REPORT_DAILY_CAP: usize = 30;

const DOCUMENT_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Dashboard Export</title>
<style>
body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #29C2E2; border-bottom: 2px solid #29C2E2; padding-bottom: 10px; }
h2 { color: #1AAAC0; margin-top: 30px; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
.stats-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 20px; margin: 20px 0; }
.performance-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; margin: 20px 0; }
.stat-card { border: 1px solid #ddd; padding: 15px; border-radius: 5px; }
.stat-value { font-size: 24px; font-weight: bold; color: #29C2E2; }
.topic { background: #e3f2fd; padding: 5px 10px; border-radius: 15px; font-size: 12px; }
.topics { display: flex; flex-wrap: wrap; gap: 10px; margin: 20px 0; }
</style>
</head>
<body>
"#;

pub fn generate(bundle: &ExportBundle) -> String {
    let mut html = String::from(DOCUMENT_HEAD);

    html.push_str("<h1>Dashboard Export Report</h1>\n");
    html.push_str(&format!(
        "<p>Generated on: {}</p>\n",
        chrono::Utc::now().format("%b %d, %Y %H:%M UTC")
    ));

    push_stats_grid(&mut html, &bundle.stats);
    push_performance_grid(&mut html, &bundle.stats);
    push_topics(&mut html, &bundle.stats);
    push_user_types(&mut html, &bundle.stats);
    push_users_summary(&mut html, bundle);
    push_daily_table(&mut html, bundle);

    html.push_str("</body>\n</html>\n");
    html
}

fn stat_card(html: &mut String, value: &str, label: &str) {
    html.push_str(&format!(
        "<div class=\"stat-card\"><div class=\"stat-value\">{}</div><div>{}</div></div>\n",
        value, label
    ));
}

fn push_stats_grid(html: &mut String, stats: &DashboardStats) {
    html.push_str("<h2>Dashboard Statistics</h2>\n<div class=\"stats-grid\">\n");
    stat_card(html, &stats.total_users.to_string(), "Total Users");
    stat_card(html, &stats.active_users_today.to_string(), "Active Users Today");
    stat_card(html, &stats.total_sessions.to_string(), "Total Sessions");
    stat_card(html, &stats.total_messages.to_string(), "Total Messages");
    html.push_str("</div>\n");
}

fn push_performance_grid(html: &mut String, stats: &DashboardStats) {
    html.push_str("<h2>Performance Metrics</h2>\n<div class=\"performance-grid\">\n");
    stat_card(
        html,
        &format!("{:.1}min", stats.avg_session_duration),
        "Avg Session Duration",
    );
    stat_card(
        html,
        &format!("{}%", format_percent(stats.retention_rate, 1)),
        "Retention Rate",
    );
    stat_card(
        html,
        &format!("{:.2}s", stats.response_time_avg),
        "Response Time",
    );
    stat_card(html, &format!("{}:00", stats.peak_usage_hour), "Peak Usage Hour");
    stat_card(
        html,
        &format!("{}%", format_percent(stats.user_satisfaction_score, 1)),
        "User Satisfaction",
    );
    stat_card(
        html,
        &format!("{}%", format_percent(stats.error_rate, 2)),
        "Error Rate",
    );
    html.push_str("</div>\n");
}

fn push_topics(html: &mut String, stats: &DashboardStats) {
    if stats.top_conversation_topics.is_empty() {
        return;
    }
    html.push_str("<h2>Top Conversation Topics</h2>\n<div class=\"topics\">\n");
    for topic in stats.top_conversation_topics.iter().take(10) {
        html.push_str(&format!(
            "<span class=\"topic\">{}</span>\n",
            escape_html(topic)
        ));
    }
    html.push_str("</div>\n");
}

fn push_user_types(html: &mut String, stats: &DashboardStats) {
    if stats.user_types_distribution.is_empty() {
        return;
    }
    html.push_str("<h2>User Types Distribution</h2>\n<table>\n");
    html.push_str("<thead><tr><th>User Type</th><th>Count</th></tr></thead>\n<tbody>\n");
    for (user_type, count) in &stats.user_types_distribution {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(user_type),
            count
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}

fn push_users_summary(html: &mut String, bundle: &ExportBundle) {
    if bundle.users.is_empty() {
        return;
    }
    html.push_str(&format!(
        "<h2>Users Summary (Top {}, excluding admin accounts)</h2>\n<table>\n",
        REPORT_USER_CAP
    ));
    html.push_str("<thead><tr><th>User ID</th><th>Type</th><th>Sessions</th><th>Messages</th><th>First Seen</th><th>Last Seen</th></tr></thead>\n<tbody>\n");
    for user in bundle
        .users
        .iter()
        .filter(|u| !u.is_service_account())
        .take(REPORT_USER_CAP)
    {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&user.user_id),
            escape_html(user.user_type.as_deref().unwrap_or("")),
            user.total_sessions,
            user.total_messages,
            user.first_seen.as_deref().map(format_date).unwrap_or_default(),
            user.last_seen.as_deref().map(format_date).unwrap_or_default(),
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}

fn push_daily_table(html: &mut String, bundle: &ExportBundle) {
    if bundle.daily.is_empty() {
        return;
    }
    html.push_str(&format!(
        "<h2>Daily Analytics (Last {} Days)</h2>\n<table>\n",
        REPORT_DAILY_CAP
    ));
    html.push_str("<thead><tr><th>Date</th><th>New Users</th><th>Active Users</th><th>Sessions</th><th>Messages</th></tr></thead>\n<tbody>\n");
    let skip = bundle.daily.len().saturating_sub(REPORT_DAILY_CAP);
    for day in bundle.daily.iter().skip(skip) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&day.date),
            day.new_users,
            day.active_users,
            day.sessions,
            day.messages,
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}

//! Excel-compatible rendering of an export bundle.
//!
//! The artifact is an HTML document carrying the
//! `urn:schemas-microsoft-com:office:excel` namespace declarations and
//! plain table markup. Served with the `application/vnd.ms-excel` MIME
//! type and an `.xls` extension, spreadsheet applications open it as a
//! workbook rather than a web page.

use crate::models::DashboardStats;
use crate::utils::{escape_html, format_date, join_list};

use super::aggregate::ExportBundle;

const DOCUMENT_HEAD: &str = r#"<html xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:x="urn:schemas-microsoft-com:office:excel" xmlns="http://www.w3.org/TR/REC-html40">
<head>
<meta charset="utf-8">
<style>
table { border-collapse: collapse; width: 100%; font-family: Arial, sans-serif; font-size: 11pt; }
th, td { border: 1px solid #cccccc; padding: 8px 12px; text-align: left; white-space: nowrap; }
th { background-color: #4472C4; color: white; font-weight: bold; text-align: center; }
.section-header { background-color: #29C2E2; color: white; font-weight: bold; font-size: 14pt; text-align: center; padding: 12px; }
tr:nth-child(even) { background-color: #f9f9f9; }
.number { text-align: right; }
</style>
</head>
<body>
"#;

pub fn generate(bundle: &ExportBundle) -> String {
    let mut html = String::from(DOCUMENT_HEAD);

    push_users_table(&mut html, bundle);
    push_daily_table(&mut html, bundle);
    push_sessions_table(&mut html, bundle);
    push_stats_table(&mut html, &bundle.stats);
    push_user_types_table(&mut html, &bundle.stats);

    html.push_str("</body></html>");
    html
}

fn section_header(html: &mut String, columns: usize, title: &str) {
    html.push_str(&format!(
        "<table>\n<tr><th colspan=\"{}\" class=\"section-header\">{}</th></tr>\n",
        columns, title
    ));
}

fn push_users_table(html: &mut String, bundle: &ExportBundle) {
    section_header(html, 8, "USERS DATA");
    html.push_str("<tr><th>User ID</th><th>User Type</th><th>Total Sessions</th><th>Total Messages</th><th>First Seen</th><th>Last Seen</th><th>Common Intent</th><th>Languages Used</th></tr>\n");
    for user in bundle.users.iter().filter(|u| !u.is_service_account()) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"number\">{}</td><td class=\"number\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&user.user_id),
            escape_html(user.user_type.as_deref().unwrap_or("")),
            user.total_sessions,
            user.total_messages,
            user.first_seen.as_deref().map(format_date).unwrap_or_default(),
            user.last_seen.as_deref().map(format_date).unwrap_or_default(),
            escape_html(user.most_common_intent.as_deref().unwrap_or("")),
            escape_html(&join_list(&user.languages_used)),
        ));
    }
    html.push_str("</table><br><br>\n");
}

fn push_daily_table(html: &mut String, bundle: &ExportBundle) {
    section_header(html, 5, "DAILY ANALYTICS");
    html.push_str("<tr><th>Date</th><th>New Users</th><th>Active Users</th><th>Sessions</th><th>Messages</th></tr>\n");
    for day in &bundle.daily {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"number\">{}</td><td class=\"number\">{}</td><td class=\"number\">{}</td><td class=\"number\">{}</td></tr>\n",
            escape_html(&day.date),
            day.new_users,
            day.active_users,
            day.sessions,
            day.messages,
        ));
    }
    html.push_str("</table><br><br>\n");
}

fn push_sessions_table(html: &mut String, bundle: &ExportBundle) {
    section_header(html, 8, "USER SESSIONS");
    html.push_str("<tr><th>Session ID</th><th>User ID</th><th>Created At</th><th>Last Active</th><th>Message Count</th><th>Duration (min)</th><th>User Type</th><th>Detected Intents</th></tr>\n");
    for session in &bundle.user_sessions {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"number\">{}</td><td class=\"number\">{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&session.session_id),
            escape_html(session.user_id.as_deref().unwrap_or("")),
            session.created_at.as_deref().map(format_date).unwrap_or_default(),
            session.last_active.as_deref().map(format_date).unwrap_or_default(),
            session.message_count,
            session.duration_minutes,
            escape_html(session.user_type.as_deref().unwrap_or("")),
            escape_html(&join_list(&session.detected_intents)),
        ));
    }
    html.push_str("</table><br><br>\n");
}

fn push_stats_table(html: &mut String, stats: &DashboardStats) {
    section_header(html, 2, "DASHBOARD STATS SUMMARY");
    html.push_str("<tr><th style=\"width: 60%;\">Metric</th><th style=\"width: 40%;\">Value</th></tr>\n");
    let rows = [
        ("Total Users", stats.total_users.to_string()),
        ("Active Users Today", stats.active_users_today.to_string()),
        ("Active Users Week", stats.active_users_week.to_string()),
        ("Total Sessions", stats.total_sessions.to_string()),
        ("Total Messages", stats.total_messages.to_string()),
        (
            "Avg Messages Per Session",
            format!("{:.1}", stats.avg_messages_per_session),
        ),
    ];
    for (metric, value) in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"number\">{}</td></tr>\n",
            metric, value
        ));
    }
    html.push_str("</table><br><br>\n");
}

fn push_user_types_table(html: &mut String, stats: &DashboardStats) {
    section_header(html, 2, "USER TYPES DISTRIBUTION");
    html.push_str("<tr><th style=\"width: 60%;\">User Type</th><th style=\"width: 40%;\">Count</th></tr>\n");
    for (user_type, count) in &stats.user_types_distribution {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"number\">{}</td></tr>\n",
            escape_html(user_type),
            count
        ));
    }
    html.push_str("</table>\n");
}

//! Tab-delimited CSV rendering of an export bundle.
//!
//! The document starts with a UTF-8 byte-order marker so spreadsheet
//! applications pick the right encoding, and is organized as one section
//! per entity class: a human-readable header line, a column header row,
//! the data rows, and a blank separator line. Tab characters inside
//! free-text fields are replaced by spaces; there is no quoting scheme
//! beyond that.

use crate::models::DashboardStats;
use crate::utils::{format_date, format_percent, join_list, sanitize_field};

use super::aggregate::ExportBundle;

/// UTF-8 byte-order marker
const BOM: &str = "\u{feff}";

pub fn generate(bundle: &ExportBundle) -> String {
    let mut csv = String::from(BOM);

    push_users(&mut csv, bundle);
    push_daily(&mut csv, bundle);
    push_user_sessions(&mut csv, bundle);
    push_active_sessions(&mut csv, bundle);
    push_stats_summary(&mut csv, &bundle.stats);

    if !bundle.stats.top_conversation_topics.is_empty() {
        csv.push_str("TOP CONVERSATION TOPICS\n");
        csv.push_str("Topic\n");
        for topic in &bundle.stats.top_conversation_topics {
            csv.push_str(&format!("{}\n", sanitize_field(topic)));
        }
        csv.push('\n');
    }

    if !bundle.stats.user_types_distribution.is_empty() {
        csv.push_str("USER TYPES DISTRIBUTION\n");
        csv.push_str("User Type\tCount\n");
        for (user_type, count) in &bundle.stats.user_types_distribution {
            csv.push_str(&format!("{}\t{}\n", sanitize_field(user_type), count));
        }
        csv.push('\n');
    }

    if !bundle.stats.language_distribution.is_empty() {
        csv.push_str("LANGUAGE DISTRIBUTION\n");
        csv.push_str("Language\tCount\n");
        for (language, count) in &bundle.stats.language_distribution {
            csv.push_str(&format!("{}\t{}\n", sanitize_field(language), count));
        }
        csv.push('\n');
    }

    if !bundle.partnership_stats.data.is_empty() {
        csv.push_str("PARTNERSHIP STATISTICS\n");
        csv.push_str("Partnership Type\tCount\n");
        for item in &bundle.partnership_stats.data {
            csv.push_str(&format!("{}\t{}\n", sanitize_field(&item.name), item.value));
        }
        csv.push('\n');
    }

    if !bundle.category_stats.data.is_empty() {
        csv.push_str("CONTENT CATEGORY STATISTICS\n");
        csv.push_str("Category\tCount\n");
        for item in &bundle.category_stats.data {
            csv.push_str(&format!("{}\t{}\n", sanitize_field(&item.name), item.value));
        }
        csv.push('\n');
    }

    csv
}

fn push_users(csv: &mut String, bundle: &ExportBundle) {
    csv.push_str("USERS DATA\n");
    csv.push_str(
        "User ID\tUser Type\tTotal Sessions\tTotal Messages\tFirst Seen\tLast Seen\tCommon Intent\tLanguages Used\n",
    );
    for user in bundle.users.iter().filter(|u| !u.is_service_account()) {
        csv.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            sanitize_field(&user.user_id),
            sanitize_field(user.user_type.as_deref().unwrap_or("")),
            user.total_sessions,
            user.total_messages,
            user.first_seen.as_deref().map(format_date).unwrap_or_default(),
            user.last_seen.as_deref().map(format_date).unwrap_or_default(),
            sanitize_field(user.most_common_intent.as_deref().unwrap_or("")),
            sanitize_field(&join_list(&user.languages_used)),
        ));
    }
    csv.push('\n');
}

fn push_daily(csv: &mut String, bundle: &ExportBundle) {
    csv.push_str("DAILY ANALYTICS DATA\n");
    csv.push_str("Date\tNew Users\tActive Users\tSessions\tMessages\n");
    for day in &bundle.daily {
        csv.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            sanitize_field(&day.date),
            day.new_users,
            day.active_users,
            day.sessions,
            day.messages,
        ));
    }
    csv.push('\n');
}

fn push_user_sessions(csv: &mut String, bundle: &ExportBundle) {
    csv.push_str("USER SESSIONS DATA\n");
    csv.push_str(
        "Session ID\tUser ID\tCreated At\tLast Active\tMessage Count\tDuration (min)\tUser Type\tDetected Intents\n",
    );
    for session in &bundle.user_sessions {
        csv.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            sanitize_field(&session.session_id),
            sanitize_field(session.user_id.as_deref().unwrap_or("")),
            session.created_at.as_deref().map(format_date).unwrap_or_default(),
            session.last_active.as_deref().map(format_date).unwrap_or_default(),
            session.message_count,
            session.duration_minutes,
            sanitize_field(session.user_type.as_deref().unwrap_or("")),
            sanitize_field(&join_list(&session.detected_intents)),
        ));
    }
    csv.push('\n');
}

fn push_active_sessions(csv: &mut String, bundle: &ExportBundle) {
    csv.push_str("ACTIVE SESSIONS DATA\n");
    csv.push_str("Session ID\tUser ID\tLast Active\tMessage Count\tUser Type\n");
    for session in &bundle.active_sessions {
        csv.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            sanitize_field(&session.session_id),
            sanitize_field(session.user_id.as_deref().unwrap_or("")),
            session.last_active.as_deref().map(format_date).unwrap_or_default(),
            session.message_count,
            sanitize_field(session.user_type.as_deref().unwrap_or("")),
        ));
    }
    csv.push('\n');
}

fn push_stats_summary(csv: &mut String, stats: &DashboardStats) {
    csv.push_str("DASHBOARD STATS SUMMARY\n");
    csv.push_str("Metric\tValue\n");
    csv.push_str(&format!("Total Users\t{}\n", stats.total_users));
    csv.push_str(&format!("Active Users Today\t{}\n", stats.active_users_today));
    csv.push_str(&format!("Active Users Week\t{}\n", stats.active_users_week));
    csv.push_str(&format!("Total Sessions\t{}\n", stats.total_sessions));
    csv.push_str(&format!("Total Messages\t{}\n", stats.total_messages));
    csv.push_str(&format!(
        "Avg Messages Per Session\t{:.1}\n",
        stats.avg_messages_per_session
    ));
    csv.push_str(&format!(
        "Avg Session Duration (min)\t{:.1}\n",
        stats.avg_session_duration
    ));
    csv.push_str(&format!("Peak Usage Hour\t{}\n", stats.peak_usage_hour));
    csv.push_str(&format!(
        "Retention Rate\t{}%\n",
        format_percent(stats.retention_rate, 1)
    ));
    csv.push_str(&format!(
        "Bounce Rate\t{}%\n",
        format_percent(stats.bounce_rate, 1)
    ));
    csv.push_str(&format!(
        "User Satisfaction Score\t{}%\n",
        format_percent(stats.user_satisfaction_score, 1)
    ));
    csv.push_str(&format!(
        "Response Time Average (s)\t{:.2}\n",
        stats.response_time_avg
    ));
    csv.push_str(&format!(
        "Error Rate\t{}%\n",
        format_percent(stats.error_rate, 2)
    ));
    csv.push('\n');
}

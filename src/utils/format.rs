/// Replace tab characters with spaces so free-text fields cannot break
/// the column layout of tab-delimited output. No further quoting is done.
pub fn sanitize_field(value: &str) -> String {
    value.replace('\t', " ")
}

/// Render a stored rate fraction (0..=1) as a percentage with the given
/// number of decimals. Rates are never stored pre-multiplied.
pub fn format_percent(rate: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, rate * 100.0)
}

/// Format a timestamp string to a short readable date.
/// Falls back to the date prefix, then the raw string, when unparseable.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        // Assume YYYY-MM-DD prefix
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Join a list field the way the dashboard renders it
pub fn join_list(values: &[String]) -> String {
    values.join("; ")
}

/// Minimal HTML escaping for values interpolated into generated markup.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("greeting\tintent"), "greeting intent");
        assert_eq!(sanitize_field("no tabs here"), "no tabs here");
        assert_eq!(sanitize_field("a\tb\tc"), "a b c");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.856, 1), "85.6");
        assert_eq!(format_percent(0.0123, 2), "1.23");
        assert_eq!(format_percent(0.0, 1), "0.0");
        assert_eq!(format_percent(1.0, 1), "100.0");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-06-15T10:30:00+00:00"), "Jun 15, 2025");
        assert_eq!(format_date("2025-06-15"), "2025-06-15");
        assert_eq!(format_date("2025-06-15 10:30:00"), "2025-06-15");
        assert_eq!(format_date("junk"), "junk");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_join_list() {
        let values = vec!["fr".to_string(), "en".to_string()];
        assert_eq!(join_list(&values), "fr; en");
        assert_eq!(join_list(&[]), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }
}

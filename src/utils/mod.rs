pub mod format;

pub use format::{escape_html, format_date, format_percent, join_list, sanitize_field};

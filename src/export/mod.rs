//! Data export pipeline.
//!
//! The [`Exporter`] aggregates the dashboard's read endpoints into an
//! [`ExportBundle`](aggregate::ExportBundle) and serializes it into a
//! downloadable [`Document`]:
//!
//! - `Csv`: BOM-prefixed, tab-delimited sections
//! - `Excel`: HTML table markup with the office XML namespaces, tagged
//!   with the Excel MIME type so spreadsheet apps claim the file
//! - `Report`: a self-contained printable HTML report ("PDF" is whatever
//!   the consumer's print pipeline makes of it)

pub mod aggregate;
pub mod csv;
pub mod excel;
pub mod report;

pub use aggregate::{ExportBundle, Exporter};

/// Output formats supported by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Report,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xls",
            ExportFormat::Report => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Excel => "application/vnd.ms-excel",
            ExportFormat::Report => "text/html",
        }
    }

    /// Parse a user-supplied format name (CLI argument).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "excel" | "xls" => Some(ExportFormat::Excel),
            "report" | "pdf" | "html" => Some(ExportFormat::Report),
            _ => None,
        }
    }
}

/// A serialized artifact plus the metadata the download path needs.
/// Built, handed to the consumer, and discarded.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: Vec<u8>,
}

impl Document {
    pub(crate) fn new(format: ExportFormat, content: String) -> Self {
        let date = chrono::Utc::now().format("%Y-%m-%d");
        Self {
            filename: format!("chatbot-data-export-{}.{}", date, format.extension()),
            mime_type: format.mime_type(),
            content: content.into_bytes(),
        }
    }

    /// Document body as text (all current formats are textual).
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("Excel"), Some(ExportFormat::Excel));
        assert_eq!(ExportFormat::parse("pdf"), Some(ExportFormat::Report));
        assert_eq!(ExportFormat::parse("docx"), None);
    }

    #[test]
    fn test_document_filename_carries_extension() {
        let document = Document::new(ExportFormat::Excel, "<html></html>".to_string());
        assert!(document.filename.starts_with("chatbot-data-export-"));
        assert!(document.filename.ends_with(".xls"));
        assert_eq!(document.mime_type, "application/vnd.ms-excel");
    }
}

//! User-facing messages.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user once, as a status line or alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn file_too_large(size_bytes: u64, limit_mb: u64) -> Self {
        Self::warning(format!(
            "File too large! Maximum {limit_mb}MB, your file is {:.1}MB",
            size_bytes as f64 / (1024.0 * 1024.0)
        ))
    }

    pub fn no_file_selected() -> Self {
        Self::warning("Choose a PDF file first")
    }

    pub fn no_document_selected() -> Self {
        Self::warning("Select or open a PDF before downloading")
    }

    pub fn missing_id() -> Self {
        Self::error("Upload succeeded, but no document ID was returned")
    }

    pub fn still_processing() -> Self {
        Self::info("Summary is still processing, check back later in the library")
    }

    pub fn connection_failed(err: impl fmt::Display) -> Self {
        Self::error(format!("Failed to connect to the backend: {err}"))
    }

    pub fn regenerate_failed() -> Self {
        Self::error("Failed to regenerate the summary")
    }

    pub fn regenerate_crashed() -> Self {
        Self::error("Something went wrong while regenerating the summary")
    }

    pub fn delete_failed() -> Self {
        Self::error("Failed to delete the file")
    }

    pub fn delete_crashed() -> Self {
        Self::error("Something went wrong while deleting the file")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Map a failed submission response to the message the user sees.
///
/// 413, or 400 whose detail mentions "too large", is the size limit; any other
/// detail is shown as-is, then a non-empty plain-text body, then the status.
pub fn submit_error_message(status: u16, detail: Option<&str>, body: &str, limit_mb: u64) -> String {
    let too_large = status == 413
        || (status == 400
            && detail.is_some_and(|d| d.to_ascii_lowercase().contains("too large")));
    if too_large {
        return format!("File too large! Maximum size is {limit_mb}MB");
    }
    if let Some(detail) = detail.filter(|d| !d.is_empty()) {
        return detail.to_string();
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    format!("Request failed (status {status})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_messages() {
        let msg = submit_error_message(413, None, "", 10);
        assert_eq!(msg, "File too large! Maximum size is 10MB");
        let msg = submit_error_message(400, Some("File Too Large for upload"), "", 10);
        assert_eq!(msg, "File too large! Maximum size is 10MB");
    }

    #[test]
    fn detail_then_body_then_status() {
        assert_eq!(
            submit_error_message(400, Some("mode must be set"), "ignored", 10),
            "mode must be set"
        );
        assert_eq!(
            submit_error_message(400, None, "only PDF files are allowed\n", 10),
            "only PDF files are allowed"
        );
        assert_eq!(
            submit_error_message(500, None, "  ", 10),
            "Request failed (status 500)"
        );
    }

    #[test]
    fn file_too_large_reports_one_decimal() {
        let notice = Notice::file_too_large(12 * 1024 * 1024 + 300 * 1024, 10);
        assert_eq!(notice.text, "File too large! Maximum 10MB, your file is 12.3MB");
        assert_eq!(notice.level, NoticeLevel::Warning);
    }
}

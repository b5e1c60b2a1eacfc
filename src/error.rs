//! Error types for the upload-and-extract workflow

use thiserror::Error;

/// Result type alias for the upload-and-extract workflow
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the upload-and-extract workflow
#[derive(Error, Debug)]
pub enum Error {
    /// Ticket endpoint rejected or could not service the request
    #[error("Failed to get upload URL (status {status}): {message}")]
    TicketRequestFailed { status: u16, message: String },

    /// Object-storage write rejected
    #[error("Upload failed: {status} {status_text}: {body}")]
    UploadFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Poll budget exhausted without a parseable extraction result
    #[error("Extraction timed out after {attempts} poll attempts")]
    ExtractionTimeout { attempts: u32 },

    /// Caller-initiated abort
    #[error("Workflow cancelled")]
    Cancelled,

    /// Result location returned a non-success status. Never surfaced by the
    /// workflow; the poll loop treats it as "not ready yet".
    #[error("Extraction result not ready (status {status})")]
    ResultNotReady { status: u16 },

    /// Invalid base URL in configuration
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    /// HTTP request error (transport-level, outside the poll loop)
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Return a sanitized error message safe to render to end users.
    /// Internal details (URLs, response bodies) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::TicketRequestFailed { .. } => "Failed to get upload URL".to_string(),
            Error::UploadFailed { status, .. } => {
                format!("Upload failed with status {}", status)
            }
            Error::ExtractionTimeout { .. } => {
                "Document processing timed out. Please try again.".to_string()
            }
            Error::Cancelled => "Upload cancelled".to_string(),
            Error::ResultNotReady { .. } => "Result not ready".to_string(),
            Error::InvalidBaseUrl { .. } => "Service is misconfigured".to_string(),
            Error::HttpRequest(_) => "HTTP request failed".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
        }
    }

    /// True for the caller-initiated abort, which is not a backend failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failed_message_includes_status_and_body() {
        let err = Error::UploadFailed {
            status: 403,
            status_text: "Forbidden".to_string(),
            body: "Forbidden".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("Forbidden"));
    }

    #[test]
    fn test_client_message_omits_body() {
        let err = Error::UploadFailed {
            status: 403,
            status_text: "Forbidden".to_string(),
            body: "<internal bucket policy details>".to_string(),
        };
        assert!(!err.client_message().contains("bucket"));
    }

    #[test]
    fn test_cancelled_is_distinguishable() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::ExtractionTimeout { attempts: 60 }.is_cancelled());
    }
}

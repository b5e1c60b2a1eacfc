//! Backend contract for the upload-and-extract workflow
//!
//! The workflow never talks HTTP directly; it drives a [`DocumentBackend`],
//! of which [`HttpBackend`] is the production implementation. Tests supply
//! scripted backends at the same seam.

mod http;

pub use http::HttpBackend;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Result of requesting an upload target from the ticket endpoint.
///
/// Owned by exactly one workflow invocation and discarded when it
/// terminates; tickets are never reused across documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    /// Single-use pre-signed write destination for the document bytes
    pub upload_url: String,
    /// Identifier the backend assigned to the eventual stored object
    pub file_key: String,
    /// Read destination where the extraction result will eventually appear
    pub result_url: String,
}

/// A binary document queued for upload, with its declared metadata.
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    /// Filename reported to the ticket endpoint
    pub filename: String,
    /// Declared media type; `None` or empty falls back to the configured
    /// default (`application/pdf`)
    pub media_type: Option<String>,
    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl DocumentPayload {
    pub fn new(filename: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            media_type,
            bytes,
        }
    }
}

/// Storage/processing backend consumed by the workflow.
#[async_trait::async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Request an upload ticket for a document with the given filename and
    /// media type. Non-success responses are terminal; the workflow does
    /// not retry this step.
    async fn request_ticket(&self, filename: &str, content_type: &str) -> Result<UploadTicket>;

    /// Write the raw document bytes to the ticket's upload target with the
    /// given `Content-Type`.
    async fn upload(&self, ticket: &UploadTicket, bytes: &[u8], content_type: &str) -> Result<()>;

    /// Read the ticket's result location once, bypassing caches. Returns
    /// the raw body on a success status; any error is treated by the poll
    /// loop as "not ready yet".
    async fn fetch_result(&self, ticket: &UploadTicket) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_deserializes_from_camel_case() {
        let json = r#"{"uploadUrl":"U","fileKey":"K","resultUrl":"R"}"#;
        let ticket: UploadTicket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.upload_url, "U");
        assert_eq!(ticket.file_key, "K");
        assert_eq!(ticket.result_url, "R");
    }

    #[test]
    fn test_ticket_rejects_missing_fields() {
        let json = r#"{"uploadUrl":"U"}"#;
        let result: std::result::Result<UploadTicket, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}

//! Workflow configuration

use std::time::Duration;

/// Environment variable holding the ticket endpoint base URL,
/// e.g. `https://abc123.execute-api.us-west-2.amazonaws.com/prod`.
pub const API_BASE_ENV: &str = "AUDIT_API_BASE";

/// Media type used when a document carries no type metadata.
/// Browsers commonly report an empty type for files dragged from disk,
/// so an empty declared type must not reject the document.
pub const DEFAULT_MEDIA_TYPE: &str = "application/pdf";

/// Timing and budget configuration for the upload-and-extract workflow
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Base URL of the ticket endpoint (`POST {base}/upload-url`)
    pub base_url: String,
    /// Per-request HTTP timeout (default: 60s)
    pub request_timeout: Duration,
    /// Maximum result poll attempts before giving up (default: 60)
    pub max_poll_attempts: u32,
    /// Delay after the first unsuccessful poll attempt (default: 2000ms)
    pub poll_base_delay: Duration,
    /// Additional delay added per attempt (default: 250ms)
    pub poll_delay_step: Duration,
    /// Fallback media type for documents with no declared type
    pub default_media_type: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout: Duration::from_secs(60),
            max_poll_attempts: 60,
            poll_base_delay: Duration::from_millis(2000),
            poll_delay_step: Duration::from_millis(250),
            default_media_type: DEFAULT_MEDIA_TYPE.to_string(),
        }
    }
}

impl WorkflowConfig {
    /// Create a config for the given ticket endpoint base URL with default
    /// timing and budgets.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read the base URL from `AUDIT_API_BASE`. Returns `None` when unset.
    pub fn from_env() -> Option<Self> {
        std::env::var(API_BASE_ENV).ok().map(Self::new)
    }

    /// Delay scheduled after unsuccessful poll attempt `attempt` (0-indexed).
    /// The wait runs after each failed attempt, never before the first.
    pub fn poll_delay(&self, attempt: u32) -> Duration {
        self.poll_base_delay + self.poll_delay_step * attempt
    }

    /// Resolve a declared media type, falling back to the configured default
    /// when it is empty or missing.
    pub fn effective_media_type<'a>(&'a self, declared: Option<&'a str>) -> &'a str {
        match declared {
            Some(t) if !t.is_empty() => t,
            _ => &self.default_media_type,
        }
    }
}

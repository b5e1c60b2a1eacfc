//! Upload-and-Extract Workflow Client
//!
//! This crate drives a document through an asynchronous extraction backend:
//! - request a pre-signed upload ticket (`POST {base}/upload-url`)
//! - `PUT` the raw document bytes to the ticket's upload target
//! - poll the ticket's result location with an increasing backoff until a
//!   parseable JSON payload appears or the attempt budget is exhausted
//!
//! Progress is surfaced as a [`WorkflowState`] sequence; runs are
//! cancellable at every suspension point, and [`UploadSlot`] enforces the
//! one-run-per-slot rule (a new upload cancels the previous one).

pub mod backend;
pub mod config;
pub mod error;
pub mod workflow;

pub use backend::{DocumentBackend, DocumentPayload, HttpBackend, UploadTicket};
pub use config::{WorkflowConfig, DEFAULT_MEDIA_TYPE};
pub use error::{Error, Result};
pub use workflow::{ExtractionWorkflow, RunHandle, UploadSlot, WorkflowState};

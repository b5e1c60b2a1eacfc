//! Upload-and-extract workflow
//!
//! Sequential pipeline: acquire an upload ticket, transfer the document
//! bytes, then poll the result location with a linearly increasing backoff
//! until a parseable JSON payload appears or the attempt budget runs out.
//! Progress is reported through a callback immediately before each phase;
//! cancellation is honored at every suspension point.

pub mod fence;
mod slot;
mod state;

pub use slot::{RunHandle, UploadSlot};
pub use state::WorkflowState;

use crate::backend::{DocumentBackend, DocumentPayload};
use crate::config::WorkflowConfig;
use crate::error::{Error, Result};
use fence::strip_code_fences;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Drives one document through ticket acquisition, upload, and result
/// polling against a [`DocumentBackend`].
pub struct ExtractionWorkflow<B> {
    backend: B,
    config: WorkflowConfig,
}

impl<B: DocumentBackend> ExtractionWorkflow<B> {
    pub fn new(backend: B, config: WorkflowConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the full workflow for one document.
    ///
    /// `on_progress` fires with the phase immediately before each step
    /// begins and once more with the terminal
    /// `Succeeded`/`Failed`/`Cancelled` state.
    ///
    /// Cancelling `token` at any suspension point stops further network
    /// calls and returns [`Error::Cancelled`]; it is never reported as a
    /// timeout or upload failure.
    pub async fn run<T, F>(
        &self,
        document: &DocumentPayload,
        token: &CancellationToken,
        mut on_progress: F,
    ) -> Result<T>
    where
        T: DeserializeOwned + Clone,
        F: FnMut(&WorkflowState<T>),
    {
        let outcome = self.execute(document, token, &mut on_progress).await;
        match &outcome {
            Ok(value) => on_progress(&WorkflowState::Succeeded(value.clone())),
            Err(Error::Cancelled) => on_progress(&WorkflowState::Cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "upload-and-extract workflow failed");
                on_progress(&WorkflowState::Failed(e.client_message()));
            }
        }
        outcome
    }

    async fn execute<T, F>(
        &self,
        document: &DocumentPayload,
        token: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnMut(&WorkflowState<T>),
    {
        let content_type = self
            .config
            .effective_media_type(document.media_type.as_deref())
            .to_string();

        on_progress(&WorkflowState::RequestingTarget);
        let ticket = self
            .checked(token, self.backend.request_ticket(&document.filename, &content_type))
            .await??;
        tracing::debug!(file_key = %ticket.file_key, "upload ticket acquired");

        on_progress(&WorkflowState::Uploading);
        self.checked(
            token,
            self.backend.upload(&ticket, &document.bytes, &content_type),
        )
        .await??;
        tracing::debug!(file_key = %ticket.file_key, bytes = document.bytes.len(), "document uploaded");

        on_progress(&WorkflowState::Processing);
        for attempt in 0..self.config.max_poll_attempts {
            match self.checked(token, self.backend.fetch_result(&ticket)).await? {
                Ok(body) => match serde_json::from_str::<T>(strip_code_fences(&body)) {
                    Ok(value) => {
                        tracing::info!(file_key = %ticket.file_key, attempt, "extraction result ready");
                        return Ok(value);
                    }
                    Err(e) => {
                        // The object may exist but be mid-write; keep polling.
                        tracing::debug!(attempt, error = %e, "result body not yet parseable");
                    }
                },
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "result not ready");
                }
            }

            if attempt + 1 < self.config.max_poll_attempts {
                let delay = self.config.poll_delay(attempt);
                tokio::select! {
                    _ = token.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        Err(Error::ExtractionTimeout {
            attempts: self.config.max_poll_attempts,
        })
    }

    /// Await a backend call unless the token is cancelled first. The outer
    /// `Result` is the cancellation gate; the inner one is the call's own.
    async fn checked<T>(
        &self,
        token: &CancellationToken,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<Result<T>> {
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            _ = token.cancelled() => Err(Error::Cancelled),
            result = fut => Ok(result),
        }
    }
}

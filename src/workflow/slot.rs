//! Single-flight invocation slot
//!
//! One logical upload slot (e.g. the wizard's document picker) may only
//! have one upload/poll cycle in flight. Starting a new run cancels the
//! previous one before spawning, so two pollers can never race to update
//! the same caller-visible state.

use crate::backend::{DocumentBackend, DocumentPayload};
use crate::error::{Error, Result};
use crate::workflow::{ExtractionWorkflow, WorkflowState};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

struct ActiveRun {
    id: u64,
    token: CancellationToken,
}

/// Owning handle for one in-flight run.
pub struct RunHandle<T> {
    token: CancellationToken,
    task: tokio::task::JoinHandle<Result<T>>,
}

impl<T> RunHandle<T> {
    /// Abort the run at its next suspension point. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the run has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Await the terminal result of the run.
    pub async fn join(self) -> Result<T> {
        match self.task.await {
            Ok(outcome) => outcome,
            // The task is only ever stopped through its token, so a join
            // error means cancellation.
            Err(_) => Err(Error::Cancelled),
        }
    }
}

/// Per-slot workflow manager: serializes invocations (cancel-before-start)
/// and publishes the caller-visible [`WorkflowState`] through a watch
/// channel. The active run's task is the sole writer; callers subscribe
/// and read at any time, treating the most recent value as authoritative.
pub struct UploadSlot<B, T = serde_json::Value> {
    workflow: Arc<ExtractionWorkflow<B>>,
    state_tx: watch::Sender<WorkflowState<T>>,
    active: Arc<Mutex<Option<ActiveRun>>>,
    next_run_id: AtomicU64,
}

impl<B, T> UploadSlot<B, T>
where
    B: DocumentBackend + 'static,
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(workflow: ExtractionWorkflow<B>) -> Self {
        let (state_tx, _) = watch::channel(WorkflowState::Idle);
        Self {
            workflow: Arc::new(workflow),
            state_tx,
            active: Arc::new(Mutex::new(None)),
            next_run_id: AtomicU64::new(0),
        }
    }

    /// Subscribe to the slot's state. The receiver sees the most recent
    /// state immediately and every subsequent transition.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState<T>> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> WorkflowState<T> {
        self.state_tx.borrow().clone()
    }

    /// Start a run for `document`, cancelling any prior in-flight run for
    /// this slot first. Returns the owning handle for the new run.
    pub fn start(&self, document: DocumentPayload) -> RunHandle<T> {
        let token = CancellationToken::new();
        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut active = self.active.lock();
            if let Some(previous) = active.replace(ActiveRun {
                id: run_id,
                token: token.clone(),
            }) {
                previous.token.cancel();
            }
        }

        let workflow = Arc::clone(&self.workflow);
        let state_tx = self.state_tx.clone();
        let active = Arc::clone(&self.active);
        let publish_gate = Arc::clone(&self.active);
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            let publish = move |state: &WorkflowState<T>| {
                // A run superseded by cancel-before-start must not clobber
                // the state its replacement is already publishing.
                let still_active = publish_gate
                    .lock()
                    .as_ref()
                    .is_some_and(|run| run.id == run_id);
                if still_active {
                    state_tx.send_replace(state.clone());
                }
            };
            let outcome = workflow.run::<T, _>(&document, &task_token, publish).await;

            // Retire this run's slot entry so a later cancel() is a no-op;
            // a replacement run's entry is left alone.
            let mut guard = active.lock();
            if guard.as_ref().is_some_and(|run| run.id == run_id) {
                *guard = None;
            }

            outcome
        });

        RunHandle { token, task }
    }

    /// Cancel the in-flight run, if any. Returns whether one was active
    /// and not already cancelled.
    pub fn cancel(&self) -> bool {
        let active = self.active.lock();
        match active.as_ref() {
            Some(run) if !run.token.is_cancelled() => {
                run.token.cancel();
                true
            }
            _ => false,
        }
    }
}

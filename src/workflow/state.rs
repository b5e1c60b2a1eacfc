//! Caller-visible workflow progress states

/// Progress signal for one upload-and-extract invocation.
///
/// Exactly one state is active at a time and transitions are monotonic
/// within an invocation; a fresh invocation restarts at
/// `Idle -> RequestingTarget`. Generic over the extracted payload `T`
/// because the workflow hands the backend's result through verbatim with
/// no knowledge of its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState<T = serde_json::Value> {
    /// No run in flight
    Idle,
    /// Requesting an upload ticket from the backend
    RequestingTarget,
    /// Transferring document bytes to the upload target
    Uploading,
    /// Polling the result location for the extraction result
    Processing,
    /// Terminal: extraction result parsed and available
    Succeeded(T),
    /// Terminal: workflow failed; carries the user-facing message
    Failed(String),
    /// Terminal: caller aborted the run
    Cancelled,
}

impl<T> WorkflowState<T> {
    /// Human-readable phase label for status display.
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::RequestingTarget => "Requesting upload URL",
            WorkflowState::Uploading => "Uploading document",
            WorkflowState::Processing => "Processing document",
            WorkflowState::Succeeded(_) => "Done",
            WorkflowState::Failed(_) => "Failed",
            WorkflowState::Cancelled => "Cancelled",
        }
    }

    /// True once the invocation has reached an end state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Succeeded(_) | WorkflowState::Failed(_) | WorkflowState::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(WorkflowState::Succeeded(serde_json::json!({})).is_terminal());
        assert!(WorkflowState::<serde_json::Value>::Failed("boom".into()).is_terminal());
        assert!(WorkflowState::<serde_json::Value>::Cancelled.is_terminal());
        assert!(!WorkflowState::<serde_json::Value>::Idle.is_terminal());
        assert!(!WorkflowState::<serde_json::Value>::Processing.is_terminal());
    }

    #[test]
    fn test_labels_are_distinct_per_phase() {
        let labels = [
            WorkflowState::<serde_json::Value>::Idle.label(),
            WorkflowState::<serde_json::Value>::RequestingTarget.label(),
            WorkflowState::<serde_json::Value>::Uploading.label(),
            WorkflowState::<serde_json::Value>::Processing.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}

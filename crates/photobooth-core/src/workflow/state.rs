//! The state projection handed to the presentation layer.

use serde::Serialize;

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WorkflowState {
    #[default]
    Idle,
    Busy,
    Success {
        result_locator: String,
    },
    Failed {
        message: String,
    },
}

impl WorkflowState {
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Busy)
    }

    /// `Success` or `Failed`: nothing more happens until reset or a new run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Success { .. } | WorkflowState::Failed { .. }
        )
    }

    pub fn result_locator(&self) -> Option<&str> {
        match self {
            WorkflowState::Success { result_locator } => Some(result_locator),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            WorkflowState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// What a call to `run` ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run reached a terminal state and published it.
    Finished(WorkflowState),
    /// A reset or newer run took over; this run changed nothing further.
    Superseded,
}

impl RunOutcome {
    pub fn state(&self) -> Option<&WorkflowState> {
        match self {
            RunOutcome::Finished(s) => Some(s),
            RunOutcome::Superseded => None,
        }
    }
}

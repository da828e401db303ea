//! Run orchestration and the observable state machine.

mod controller;
mod state;

pub use controller::{WorkflowController, WorkflowOptions};
pub use state::{RunOutcome, WorkflowState};

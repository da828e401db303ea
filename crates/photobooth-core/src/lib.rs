pub mod config;
pub mod logging;

pub mod error;
pub mod locator;
pub mod payload;
pub mod stages;
pub mod transport;
pub mod workflow;

pub use error::{Slot, WorkflowError};
pub use locator::{normalize, LocatorNormalizer};
pub use payload::Payload;
pub use workflow::{RunOutcome, WorkflowController, WorkflowOptions, WorkflowState};

//! Error taxonomy for a workflow run.
//!
//! Every stage returns a [`WorkflowError`]; the controller turns it into the
//! single message shown to the user via [`WorkflowError::user_message`].

use std::fmt;

/// Position of a payload within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::First => write!(f, "first"),
            Slot::Second => write!(f, "second"),
        }
    }
}

/// Any failure that ends a run.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Required inputs were not supplied. Detected before any I/O.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} payload missing")]
    MissingPayload(Slot),
    #[error("both payloads missing")]
    NoPayloads,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// `/upload` answered with a non-2xx status.
    #[error("upload of {slot} image returned HTTP {status} {reason}")]
    TransportFailure {
        slot: Slot,
        status: u32,
        reason: String,
    },
    /// 2xx response without a usable `file_url`.
    #[error("upload of {slot} image returned no file_url")]
    MissingLocator { slot: Slot },
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// 5xx from `/generate-photobooth`.
    #[error("generation service unavailable (HTTP {status})")]
    ServiceUnavailable { status: u32, detail: String },
    /// Any other non-2xx from `/generate-photobooth`.
    #[error("generation request rejected: HTTP {status} {reason}")]
    RequestRejected {
        status: u32,
        reason: String,
        detail: String,
    },
    /// 2xx response carrying none of the recognized result fields.
    #[error("generation response has no result field")]
    MissingResult,
}

/// How a call that never produced an HTTP status failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Connect or transfer timed out.
    Timeout,
    /// DNS, refused connection, reset, TLS handshake and similar.
    Connection,
    /// The blocking transfer task panicked or was cancelled.
    Aborted,
    Other,
}

/// The request could not complete at all.
#[derive(Debug, thiserror::Error)]
#[error("network error ({kind:?}): {detail}")]
pub struct NetworkError {
    pub kind: NetworkErrorKind,
    pub detail: String,
}

impl NetworkError {
    pub fn new(kind: NetworkErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

pub(crate) const MSG_VALIDATION: &str = "Please upload both selfies.";
pub(crate) const MSG_MISSING_LOCATOR: &str =
    "An uploaded file URL was not returned from the server.";
pub(crate) const MSG_SERVICE_UNAVAILABLE: &str = "Server error: the image generation service is currently unavailable. Please try again later.";
pub(crate) const MSG_MISSING_RESULT: &str = "Generated image URL not found in server response.";
pub(crate) const MSG_NETWORK: &str = "Cannot connect to the image service. Please check your connection and the backend configuration.";
pub(crate) const MSG_TIMEOUT: &str = "The image service did not respond in time. Please try again.";

impl WorkflowError {
    /// The one human-readable message stored in `WorkflowState::Failed`.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(_) => MSG_VALIDATION.to_string(),
            WorkflowError::Upload(UploadError::TransportFailure { status, reason, .. }) => {
                with_reason("Image upload failed", *status, reason)
            }
            WorkflowError::Upload(UploadError::MissingLocator { .. }) => {
                MSG_MISSING_LOCATOR.to_string()
            }
            WorkflowError::Generation(GenerationError::ServiceUnavailable { .. }) => {
                MSG_SERVICE_UNAVAILABLE.to_string()
            }
            WorkflowError::Generation(GenerationError::RequestRejected {
                status, reason, ..
            }) => with_reason("Image generation failed", *status, reason),
            WorkflowError::Generation(GenerationError::MissingResult) => {
                MSG_MISSING_RESULT.to_string()
            }
            WorkflowError::Network(e) if e.kind == NetworkErrorKind::Timeout => {
                MSG_TIMEOUT.to_string()
            }
            WorkflowError::Network(_) => MSG_NETWORK.to_string(),
        }
    }
}

fn with_reason(prefix: &str, status: u32, reason: &str) -> String {
    let reason = reason.trim();
    if reason.is_empty() {
        format!("{prefix}: {status}")
    } else {
        format!("{prefix}: {status} {reason}")
    }
}

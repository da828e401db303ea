//! Upload stage: one multipart POST per image, both in flight at once.

use std::sync::Arc;

use super::blocking;
use crate::error::{Slot, UploadError, WorkflowError};
use crate::payload::Payload;
use crate::transport::{HttpResponse, Transport};

pub const UPLOAD_PATH: &str = "/upload";
/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";
/// JSON field holding the stored image's locator.
pub const LOCATOR_FIELD: &str = "file_url";

pub struct UploadStage<T> {
    transport: Arc<T>,
    url: String,
}

impl<T: Transport> UploadStage<T> {
    pub fn new(transport: Arc<T>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Uploads one payload and returns the raw locator the backend assigned.
    pub async fn upload(&self, slot: Slot, payload: Payload) -> Result<String, WorkflowError> {
        tracing::info!(%slot, file = payload.file_name(), bytes = payload.len(), "uploading image");
        let transport = Arc::clone(&self.transport);
        let url = self.url.clone();
        let response =
            blocking(move || transport.post_multipart(&url, UPLOAD_FIELD, &payload)).await?;
        let locator = extract_locator(slot, &response)?;
        tracing::debug!(%slot, locator = %locator, "upload accepted");
        Ok(locator)
    }

    /// Uploads both payloads concurrently. Fails as a unit on the first
    /// error; on success the locators come back in payload order.
    pub async fn upload_both(
        &self,
        first: Payload,
        second: Payload,
    ) -> Result<(String, String), WorkflowError> {
        tokio::try_join!(
            self.upload(Slot::First, first),
            self.upload(Slot::Second, second)
        )
    }
}

/// Validates an `/upload` response and pulls out `file_url`.
pub fn extract_locator(slot: Slot, response: &HttpResponse) -> Result<String, UploadError> {
    if !response.is_success() {
        tracing::warn!(
            %slot,
            status = response.status,
            body = %response.body_snippet(256),
            "upload rejected"
        );
        return Err(UploadError::TransportFailure {
            slot,
            status: response.status,
            reason: response.reason.clone(),
        });
    }

    let value: serde_json::Value = match serde_json::from_slice(&response.body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%slot, error = %e, "upload response is not JSON");
            return Err(UploadError::MissingLocator { slot });
        }
    };

    match value.get(LOCATOR_FIELD).and_then(serde_json::Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(UploadError::MissingLocator { slot }),
    }
}

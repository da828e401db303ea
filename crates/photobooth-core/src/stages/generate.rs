//! Generation stage: ask the backend to compose the two uploaded images.

use std::sync::Arc;

use super::blocking;
use crate::error::{GenerationError, WorkflowError};
use crate::transport::{HttpResponse, Transport};

pub const GENERATE_PATH: &str = "/generate-photobooth";

/// Fields that may carry the generated image's locator, in lookup order.
pub const RESULT_FIELDS: [&str; 4] = ["generated_image_url", "image_url", "url", "result"];

/// How much of an error body is kept for diagnostics.
const DETAIL_LIMIT: usize = 512;

pub struct GenerationStage<T> {
    transport: Arc<T>,
    url: String,
}

impl<T: Transport> GenerationStage<T> {
    pub fn new(transport: Arc<T>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Requests the composite for two normalized locators; returns the raw
    /// result locator.
    pub async fn generate(&self, first: &str, second: &str) -> Result<String, WorkflowError> {
        tracing::info!(first, second, "requesting generation");
        let body = serde_json::json!({
            "image_url_1": first,
            "image_url_2": second,
        })
        .to_string()
        .into_bytes();

        let transport = Arc::clone(&self.transport);
        let url = self.url.clone();
        let response = blocking(move || transport.post_json(&url, &body)).await?;
        Ok(check_response(&response)?)
    }
}

fn check_response(response: &HttpResponse) -> Result<String, GenerationError> {
    if !response.is_success() {
        let detail = response.body_snippet(DETAIL_LIMIT);
        tracing::warn!(status = response.status, body = %detail, "generation failed");
        return Err(if response.status >= 500 {
            GenerationError::ServiceUnavailable {
                status: response.status,
                detail,
            }
        } else {
            GenerationError::RequestRejected {
                status: response.status,
                reason: response.reason.clone(),
                detail,
            }
        });
    }

    extract_result(&response.body).ok_or_else(|| {
        tracing::warn!(body = %response.body_snippet(DETAIL_LIMIT), "no result field in generation response");
        GenerationError::MissingResult
    })
}

/// First non-empty string among [`RESULT_FIELDS`] in a JSON body.
pub fn extract_result(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    RESULT_FIELDS
        .iter()
        .filter_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

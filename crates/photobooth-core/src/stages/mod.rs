//! The two network stages of a run: upload both images, then generate.

mod generate;
mod upload;

pub use generate::{extract_result, GenerationStage, GENERATE_PATH, RESULT_FIELDS};
pub use upload::{extract_locator, UploadStage, LOCATOR_FIELD, UPLOAD_FIELD, UPLOAD_PATH};

use crate::error::{NetworkError, NetworkErrorKind};
use crate::transport::HttpResponse;

/// Absolute endpoint URLs derived from the backend origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub upload: String,
    pub generate: String,
}

impl Endpoints {
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim().trim_end_matches('/');
        Self {
            upload: format!("{origin}{UPLOAD_PATH}"),
            generate: format!("{origin}{GENERATE_PATH}"),
        }
    }
}

/// Runs one blocking transport call on the blocking pool.
async fn blocking<F>(f: F) -> Result<HttpResponse, NetworkError>
where
    F: FnOnce() -> Result<HttpResponse, NetworkError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        NetworkError::new(NetworkErrorKind::Aborted, format!("transfer task failed: {e}"))
    })?
}

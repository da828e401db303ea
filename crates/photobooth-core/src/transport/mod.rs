//! HTTP seam between the stages and the network.
//!
//! Stages only see [`Transport`]; the production implementation is
//! [`CurlTransport`]. Calls are blocking and are run on tokio's blocking
//! pool by the stages.

mod classify;
mod libcurl;

pub use classify::classify_curl_error;
pub use libcurl::{CurlOptions, CurlTransport};

use crate::error::NetworkError;
use crate::payload::Payload;

/// A completed HTTP exchange (any status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    /// Reason phrase from the status line; empty for HTTP/2 or when absent.
    pub reason: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u32, reason: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text for diagnostics, cut at `max` bytes.
    pub fn body_snippet(&self, max: usize) -> String {
        let end = self.body.len().min(max);
        let mut s = String::from_utf8_lossy(&self.body[..end]).into_owned();
        if self.body.len() > max {
            s.push('…');
        }
        s
    }
}

/// Blocking HTTP client used by the upload and generation stages.
///
/// `Err` means no HTTP status was obtained at all; any status, including
/// 4xx/5xx, is returned as `Ok`.
pub trait Transport: Send + Sync + 'static {
    /// `POST url` with `payload` as a multipart form part named `field`.
    fn post_multipart(
        &self,
        url: &str,
        field: &str,
        payload: &Payload,
    ) -> Result<HttpResponse, NetworkError>;

    /// `POST url` with a JSON body.
    fn post_json(&self, url: &str, body: &[u8]) -> Result<HttpResponse, NetworkError>;
}

/// Extract the reason phrase from an HTTP status line
/// (`HTTP/1.1 404 Not Found` → `Not Found`).
pub(crate) fn reason_from_status_line(line: &str) -> Option<String> {
    let line = line.trim_end();
    if !line.starts_with("HTTP/") {
        return None;
    }
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next()?;
    let _code = parts.next()?;
    Some(parts.next().unwrap_or("").trim().to_string())
}

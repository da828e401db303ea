//! libcurl-backed [`Transport`].
//!
//! One `Easy` handle per request. Runs in the calling thread; the stages call
//! it from `spawn_blocking`.

use curl::easy::{Easy, Form, List};
use std::str;
use std::time::Duration;

use super::{reason_from_status_line, HttpResponse, Transport};
use crate::error::NetworkError;
use crate::payload::Payload;

/// Timeouts applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer limit. `None` waits as long as the server takes.
    pub timeout: Option<Duration>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CurlOptions {
        self.options
    }

    fn easy(&self, url: &str) -> Result<Easy, NetworkError> {
        let mut easy = Easy::new();
        easy.url(url)?;
        easy.useragent(concat!("photobooth/", env!("CARGO_PKG_VERSION")))?;
        easy.connect_timeout(self.options.connect_timeout)?;
        if let Some(t) = self.options.timeout {
            easy.timeout(t)?;
        }
        Ok(easy)
    }

    fn perform(&self, mut easy: Easy, url: &str) -> Result<HttpResponse, NetworkError> {
        let mut body: Vec<u8> = Vec::new();
        let mut reason = String::new();
        {
            let mut transfer = easy.transfer();
            // Interim responses (100 Continue) also produce a status line; the last one wins.
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    if let Some(r) = reason_from_status_line(s) {
                        reason = r;
                    }
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform().map_err(|e| {
                tracing::warn!(url, error = %e, "request did not complete");
                NetworkError::from(e)
            })?;
        }
        let status = easy.response_code()?;
        tracing::debug!(url, status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            reason,
            body,
        })
    }
}

impl Transport for CurlTransport {
    fn post_multipart(
        &self,
        url: &str,
        field: &str,
        payload: &Payload,
    ) -> Result<HttpResponse, NetworkError> {
        let mut easy = self.easy(url)?;

        let mut form = Form::new();
        form.part(field)
            .buffer(payload.file_name(), payload.bytes().to_vec())
            .content_type(payload.content_type())
            .add()?;
        easy.httppost(form)?;

        // No `Expect: 100-continue` round trip for image-sized bodies.
        let mut list = List::new();
        list.append("Expect:")?;
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        tracing::debug!(url, file = payload.file_name(), bytes = payload.len(), "POST multipart");
        self.perform(easy, url)
    }

    fn post_json(&self, url: &str, body: &[u8]) -> Result<HttpResponse, NetworkError> {
        let mut easy = self.easy(url)?;
        easy.post(true)?;
        easy.post_fields_copy(body)?;

        let mut list = List::new();
        list.append("Content-Type: application/json")?;
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        tracing::debug!(url, bytes = body.len(), "POST json");
        self.perform(easy, url)
    }
}

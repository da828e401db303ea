//! Classify curl errors into network error kinds.

use crate::error::{NetworkError, NetworkErrorKind};

/// Map a curl error to a [`NetworkError`].
pub fn classify_curl_error(e: &curl::Error) -> NetworkError {
    let kind = if e.is_operation_timedout() {
        NetworkErrorKind::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        NetworkErrorKind::Connection
    } else {
        NetworkErrorKind::Other
    };
    NetworkError::new(kind, e.to_string())
}

impl From<curl::Error> for NetworkError {
    fn from(e: curl::Error) -> Self {
        classify_curl_error(&e)
    }
}

impl From<curl::FormError> for NetworkError {
    fn from(e: curl::FormError) -> Self {
        NetworkError::new(NetworkErrorKind::Other, format!("multipart form: {e}"))
    }
}

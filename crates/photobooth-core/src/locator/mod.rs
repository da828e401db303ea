//! Resource locator normalization.
//!
//! The backend sometimes answers with locators that point at its own dev
//! setup (`http://localhost:3000/...`) or at a template placeholder host.
//! Those are rewritten onto the configured backend origin, keeping path and
//! query. Everything else passes through untouched.

mod host;

pub use host::{is_loopback, is_placeholder};

/// Placeholder hosts the backend is known to emit.
pub const DEFAULT_PLACEHOLDER_HOSTS: &[&str] = &["your-api-domain.com"];

/// Rewrites placeholder/loopback locators onto one backend origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorNormalizer {
    origin: String,
    placeholder_hosts: Vec<String>,
}

impl LocatorNormalizer {
    /// Normalizer for `origin` using [`DEFAULT_PLACEHOLDER_HOSTS`].
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_placeholders(
            origin,
            DEFAULT_PLACEHOLDER_HOSTS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_placeholders(origin: impl Into<String>, placeholder_hosts: Vec<String>) -> Self {
        let origin = origin.into();
        let origin = origin.trim().trim_end_matches('/').to_string();
        Self {
            origin,
            placeholder_hosts,
        }
    }

    /// Origin without trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Normalize one locator.
    ///
    /// - `""` stays `""`; callers treat it as missing.
    /// - placeholder or loopback host (any scheme, any port) becomes
    ///   `origin + path [+ "?" + query]`.
    /// - anything else, including input that does not parse as an absolute
    ///   URL, is returned unchanged.
    pub fn normalize(&self, locator: &str) -> String {
        if locator.is_empty() {
            return String::new();
        }
        let parsed = match url::Url::parse(locator) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!(locator, error = %e, "locator not an absolute URL, left unchanged");
                return locator.to_string();
            }
        };
        let Some(host) = parsed.host() else {
            return locator.to_string();
        };
        if !(is_loopback(&host) || is_placeholder(&host, &self.placeholder_hosts)) {
            return locator.to_string();
        }

        let mut out = String::with_capacity(self.origin.len() + locator.len());
        out.push_str(&self.origin);
        let path = parsed.path();
        if !path.starts_with('/') {
            out.push('/');
        }
        out.push_str(path);
        if let Some(q) = parsed.query() {
            out.push('?');
            out.push_str(q);
        }
        tracing::debug!(from = locator, to = %out, "rewrote locator onto backend origin");
        out
    }
}

/// Normalize `locator` against `backend_origin` with the default placeholder hosts.
///
/// # Examples
///
/// - `normalize("http://localhost:3000/files/abc.png", "https://api.example.com")` → `"https://api.example.com/files/abc.png"`
/// - `normalize("https://api.example.com/files/abc.png", "https://api.example.com")` → unchanged
pub fn normalize(locator: &str, backend_origin: &str) -> String {
    LocatorNormalizer::new(backend_origin).normalize(locator)
}

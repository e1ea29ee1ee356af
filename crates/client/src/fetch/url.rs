//! URL resolution for intercepted requests.
//!
//! The host hands the controller either absolute URLs or origin-relative
//! paths (`/favicon.ico`). Both are resolved here into one canonical form
//! so that cache keys line up across install and fetch.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("origin must be an absolute http(s) URL: {0}")]
    InvalidOrigin(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse an origin string, keeping only scheme, host and port.
pub fn parse_origin(input: &str) -> Result<Url, UrlError> {
    let mut parsed = Url::parse(input.trim()).map_err(|e| UrlError::InvalidOrigin(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(UrlError::InvalidOrigin(input.to_string()));
    }

    parsed.set_path("/");
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed)
}

/// Resolve a request URL against the application origin.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Join relative references onto `origin`
/// 3. Lowercase the host (done by the URL parser for special schemes)
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
///
/// Any scheme is accepted; deciding what to intercept is the
/// controller's job, not the resolver's.
pub fn resolve(origin: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    parsed.set_fragment(None);

    Ok(parsed)
}

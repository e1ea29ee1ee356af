//! Request descriptors and response snapshots.
//!
//! These are the values that flow through the controller and get
//! persisted by cache stores. A response is a full snapshot (status,
//! headers, body), so cloning one is what "store a clone" means here.

use bytes::Bytes;
use url::Url;

use crate::cache::hash::compute_cache_key;

/// Status of a successful, cacheable response.
pub const STATUS_OK: u16 = 200;

/// Status of the synthetic response served when neither network nor cache can answer.
pub const STATUS_OFFLINE: u16 = 503;

/// Body of the synthetic offline response.
pub const OFFLINE_BODY: &str = "Offline";

/// An intercepted request: method plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Upper-cased HTTP method.
    pub method: String,
    pub url: Url,
}

impl Request {
    /// Create a request, normalizing the method to upper case.
    pub fn new(method: &str, url: Url) -> Self {
        Self { method: method.trim().to_ascii_uppercase(), url }
    }

    /// Create a GET request.
    pub fn get(url: Url) -> Self {
        Self { method: "GET".to_string(), url }
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Cache key for this request (method + URL).
    pub fn cache_key(&self) -> String {
        compute_cache_key(&self.method, self.url.as_str())
    }
}

/// A response snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Header pairs in arrival order; names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self { status, headers, body: body.into() }
    }

    /// The synthetic `503 Offline` response.
    pub fn offline() -> Self {
        Self::new(
            STATUS_OFFLINE,
            vec![("content-type".to_string(), "text/plain;charset=UTF-8".to_string())],
            Bytes::from_static(OFFLINE_BODY.as_bytes()),
        )
    }

    /// Only an exact 200 is written to a cache store.
    pub fn is_cacheable(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Whether the status is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_request_method_normalized() {
        let req = Request::new(" post ", url("https://example.com/contact"));
        assert_eq!(req.method, "POST");
        assert!(!req.is_get());
        assert!(Request::get(url("https://example.com/")).is_get());
    }

    #[test]
    fn test_cache_key_depends_on_method_and_url() {
        let get = Request::get(url("https://example.com/a.js"));
        let head = Request::new("HEAD", url("https://example.com/a.js"));
        let other = Request::get(url("https://example.com/b.js"));
        assert_eq!(get.cache_key(), Request::get(url("https://example.com/a.js")).cache_key());
        assert_ne!(get.cache_key(), head.cache_key());
        assert_ne!(get.cache_key(), other.cache_key());
    }

    #[test]
    fn test_offline_response() {
        let resp = Response::offline();
        assert_eq!(resp.status, 503);
        assert_eq!(resp.body_text(), "Offline");
        assert_eq!(resp.header("Content-Type"), Some("text/plain;charset=UTF-8"));
        assert!(!resp.is_cacheable());
    }

    #[test]
    fn test_only_exact_200_is_cacheable() {
        assert!(Response::new(200, vec![], "ok").is_cacheable());
        let partial = Response::new(206, vec![], "part");
        assert!(partial.is_ok());
        assert!(!partial.is_cacheable());
        assert!(!Response::new(304, vec![], "").is_cacheable());
        assert!(!Response::new(404, vec![], "").is_cacheable());
    }

    #[test]
    fn test_header_names_lowercased() {
        let resp = Response::new(200, vec![("ETag".to_string(), "\"abc\"".to_string())], "");
        assert_eq!(resp.headers[0].0, "etag");
        assert_eq!(resp.header("etag"), Some("\"abc\""));
    }
}

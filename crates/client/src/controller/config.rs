//! Controller configuration.
//!
//! Generation identifiers and resource lists are compile-time constants,
//! bumped by hand on deploy to force a new cache generation. The host
//! only supplies the origin.

use swcache_core::{AppConfig, Request};
use url::Url;

use crate::fetch::{UrlError, parse_origin, resolve};

/// Umbrella generation identifier. Reserved; not read by any operation.
pub const CACHE_NAME: &str = "portfolio-v2";

/// Store holding long-lived, content-hashed assets.
pub const STATIC_CACHE: &str = "static-v2";

/// Store holding documents and other network-first responses.
pub const DYNAMIC_CACHE: &str = "dynamic-v2";

/// Written into the static store at install.
pub const CRITICAL_RESOURCES: &[&str] = &["/", "/favicon.ico"];

/// Reserved for warming on first request; not read by any operation.
pub const CACHE_ON_REQUEST: &[&str] = &["/cv.pdf", "/logo.png"];

/// Cross-origin hosts that get cache-first treatment.
pub const FONT_HOSTS: &[&str] = &["fonts.googleapis.com", "fonts.gstatic.com"];

/// Path segment marking bundled static assets.
pub const ASSETS_MARKER: &str = "/assets/";

/// Path suffixes marking bundled static assets.
pub const ASSET_EXTENSIONS: &[&str] = &[".css", ".js"];

/// Browser extension schemes that are never intercepted.
pub const EXTENSION_SCHEMES: &[&str] = &["chrome-extension", "moz-extension", "safari-web-extension"];

/// The cache generation identifiers in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generations {
    pub umbrella: String,
    pub static_cache: String,
    pub dynamic_cache: String,
}

impl Default for Generations {
    fn default() -> Self {
        Self::new(CACHE_NAME, STATIC_CACHE, DYNAMIC_CACHE)
    }
}

impl Generations {
    pub fn new(umbrella: &str, static_cache: &str, dynamic_cache: &str) -> Self {
        Self {
            umbrella: umbrella.to_string(),
            static_cache: static_cache.to_string(),
            dynamic_cache: dynamic_cache.to_string(),
        }
    }

    /// Whether a store name belongs to the current generation.
    ///
    /// Only the static and dynamic identifiers count; a store named after
    /// the umbrella identifier is stale like any other.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.static_cache || name == self.dynamic_cache
    }
}

/// Everything the controller needs, fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Scheme, host and port the controller is scoped to.
    pub origin: Url,
    pub generations: Generations,
    /// Origin-relative paths or absolute URLs fetched at install.
    pub critical_resources: Vec<String>,
    /// Reserved slot; carried but not acted on.
    pub cache_on_request: Vec<String>,
    pub font_hosts: Vec<String>,
}

impl ControllerConfig {
    /// Configuration with the built-in constants for the given origin.
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            generations: Generations::default(),
            critical_resources: CRITICAL_RESOURCES.iter().map(|s| s.to_string()).collect(),
            cache_on_request: CACHE_ON_REQUEST.iter().map(|s| s.to_string()).collect(),
            font_hosts: FONT_HOSTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build from host configuration; only the origin is taken from it.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, UrlError> {
        Ok(Self::new(parse_origin(&config.origin)?))
    }

    pub fn with_generations(mut self, generations: Generations) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_critical_resources<I, T>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.critical_resources = resources.into_iter().map(Into::into).collect();
        self
    }

    /// The install-time GET requests, resolved against the origin.
    pub fn critical_requests(&self) -> Result<Vec<Request>, UrlError> {
        self.critical_resources
            .iter()
            .map(|path| resolve(&self.origin, path).map(Request::get))
            .collect()
    }

    pub fn is_font_host(&self, host: &str) -> bool {
        self.font_hosts.iter().any(|h| h.eq_ignore_ascii_case(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://portfolio.example/").unwrap()
    }

    #[test]
    fn test_default_generations() {
        let generations = Generations::default();
        assert_eq!(generations.static_cache, "static-v2");
        assert_eq!(generations.dynamic_cache, "dynamic-v2");
        assert_eq!(generations.umbrella, "portfolio-v2");
    }

    #[test]
    fn test_is_current() {
        let generations = Generations::default();
        assert!(generations.is_current("static-v2"));
        assert!(generations.is_current("dynamic-v2"));
        assert!(!generations.is_current("static-v1"));
        assert!(!generations.is_current("portfolio-v2"));
    }

    #[test]
    fn test_critical_requests_resolved() {
        let config = ControllerConfig::new(origin());
        let urls: Vec<String> = config
            .critical_requests()
            .unwrap()
            .into_iter()
            .map(|r| r.url.to_string())
            .collect();
        assert_eq!(urls, vec!["https://portfolio.example/", "https://portfolio.example/favicon.ico"]);
    }

    #[test]
    fn test_reserved_slots_preserved() {
        let config = ControllerConfig::new(origin());
        assert_eq!(config.cache_on_request, vec!["/cv.pdf", "/logo.png"]);
        assert_eq!(config.generations.umbrella, CACHE_NAME);
    }

    #[test]
    fn test_from_app_config() {
        let app = AppConfig { origin: "https://portfolio.example/ignored".into(), ..Default::default() };
        let config = ControllerConfig::from_app_config(&app).unwrap();
        assert_eq!(config.origin, origin());

        let bad = AppConfig { origin: "portfolio.example".into(), ..Default::default() };
        assert!(ControllerConfig::from_app_config(&bad).is_err());
    }

    #[test]
    fn test_font_host_case_insensitive() {
        let config = ControllerConfig::new(origin());
        assert!(config.is_font_host("fonts.gstatic.com"));
        assert!(config.is_font_host("Fonts.GoogleApis.com"));
        assert!(!config.is_font_host("www.googletagmanager.com"));
    }
}

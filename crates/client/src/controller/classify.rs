//! Request classification.
//!
//! Decides, per intercepted request, which retrieval policy applies.
//! Checks run in order: method, scheme, origin, then path or host.

use std::fmt;

use swcache_core::Request;
use url::Url;

use super::config::{ASSET_EXTENSIONS, ASSETS_MARKER, ControllerConfig, EXTENSION_SCHEMES};

/// How an intercepted request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPolicy {
    /// Not intercepted; the host handles it and no store is touched.
    Ignore,
    /// Static store first, network on miss.
    CacheFirst,
    /// Network first, dynamic store on failure.
    NetworkFirst,
    /// Plain network fetch, no caching, no fallback.
    NetworkOnly,
}

impl fmt::Display for RequestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPolicy::Ignore => "ignore",
            RequestPolicy::CacheFirst => "cache-first",
            RequestPolicy::NetworkFirst => "network-first",
            RequestPolicy::NetworkOnly => "network-only",
        };
        f.write_str(name)
    }
}

/// Classify a request against the controller configuration.
pub fn classify(request: &Request, config: &ControllerConfig) -> RequestPolicy {
    if !request.is_get() || is_extension_scheme(&request.url) {
        return RequestPolicy::Ignore;
    }

    if request.url.origin() == config.origin.origin() {
        if is_static_asset(&request.url) {
            RequestPolicy::CacheFirst
        } else {
            RequestPolicy::NetworkFirst
        }
    } else if request.url.host_str().is_some_and(|host| config.is_font_host(host)) {
        RequestPolicy::CacheFirst
    } else {
        RequestPolicy::NetworkOnly
    }
}

fn is_extension_scheme(url: &Url) -> bool {
    EXTENSION_SCHEMES.contains(&url.scheme())
}

/// Bundled assets live under the assets marker or carry a
/// stylesheet/script extension.
fn is_static_asset(url: &Url) -> bool {
    let path = url.path();
    path.contains(ASSETS_MARKER) || ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

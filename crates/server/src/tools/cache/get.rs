//! cache_get tool implementation.
//!
//! Retrieves a stored response from a named store without creating the
//! store or touching the network.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::resolve;
use swcache_core::{CacheStorage, CacheStore, Error, Request};
use url::Url;

use crate::error::HostError;
use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Store name, e.g. "static-v2".
    pub store: String,

    /// Absolute URL or origin-relative path of the cached request.
    pub url: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub store: String,
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Body as UTF-8 (lossy).
    pub body: String,
    pub body_len: usize,
}

/// Implementation of the cache_get tool.
pub async fn get_impl<S: CacheStorage>(
    storage: &S, origin: &Url, params: CacheGetParams,
) -> Result<CallToolResult, McpError> {
    let url = resolve(origin, &params.url).map_err(HostError::from)?;

    if !storage.has(&params.store).await? {
        return Err(Error::CacheMiss(format!("no cache store named {}", params.store)).into());
    }

    let request = Request::get(url);
    let store = storage.open(&params.store).await?;
    let response = store
        .match_request(&request)
        .await?
        .ok_or_else(|| Error::CacheMiss(format!("{} not in {}", request.url, params.store)))?;

    let output = CacheGetOutput {
        store: params.store,
        url: request.url.to_string(),
        status: response.status,
        body: response.body_text(),
        body_len: response.body.len(),
        headers: response.headers,
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::parse_output;
    use swcache_core::{CacheDb, Response};

    fn origin() -> Url {
        Url::parse("https://portfolio.example/").unwrap()
    }

    #[tokio::test]
    async fn test_get_impl_found() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let store = cache.open("static-v2").await.unwrap();
        store
            .put(
                &Request::get(origin().join("/favicon.ico").unwrap()),
                &Response::new(200, vec![("content-type".into(), "image/x-icon".into())], "ico"),
            )
            .await
            .unwrap();

        let params = CacheGetParams { store: "static-v2".into(), url: "/favicon.ico".into() };
        let result = get_impl(&cache, &origin(), params).await.unwrap();
        let output: CacheGetOutput = parse_output(&result);

        assert_eq!(output.url, "https://portfolio.example/favicon.ico");
        assert_eq!(output.status, 200);
        assert_eq!(output.body, "ico");
        assert_eq!(output.headers, vec![("content-type".to_string(), "image/x-icon".to_string())]);
    }

    #[tokio::test]
    async fn test_get_impl_missing_entry() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        cache.open("static-v2").await.unwrap();

        let params = CacheGetParams { store: "static-v2".into(), url: "/nope".into() };
        let err = get_impl(&cache, &origin(), params).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_get_impl_missing_store_not_created() {
        let cache = CacheDb::open_in_memory().await.unwrap();

        let params = CacheGetParams { store: "dynamic-v9".into(), url: "/".into() };
        let err = get_impl(&cache, &origin(), params).await.unwrap_err();

        assert_eq!(err.code.0, -32001);
        assert!(cache.keys().await.unwrap().is_empty());
    }
}

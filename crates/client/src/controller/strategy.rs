//! Retrieval strategies.
//!
//! Both strategies make at most one network attempt and always produce a
//! response. Store failures never reach the caller: a store that cannot be
//! opened or read counts as a miss, and a failed write is logged and the
//! live response returned anyway.

use swcache_core::{CacheStorage, CacheStore, Network, Request, Response};

/// Open a store, degrading to `None` if storage is unavailable.
async fn open_store<S: CacheStorage>(storage: &S, name: &str) -> Option<S::Store> {
    match storage.open(name).await {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(store = name, error = %e, "cache store unavailable");
            None
        }
    }
}

async fn lookup<C: CacheStore>(store: Option<&C>, request: &Request) -> Option<Response> {
    let store = store?;
    match store.match_request(request).await {
        Ok(hit) => hit,
        Err(e) => {
            tracing::warn!(store = store.name(), url = %request.url, error = %e, "cache lookup failed");
            None
        }
    }
}

/// Store a clone of a 200 response; anything else is left uncached.
async fn store_if_cacheable<C: CacheStore>(store: Option<&C>, request: &Request, response: &Response) {
    let Some(store) = store else {
        return;
    };
    if !response.is_cacheable() {
        tracing::debug!(url = %request.url, status = response.status, "not caching non-200 response");
        return;
    }
    if let Err(e) = store.put(request, response).await {
        tracing::warn!(store = store.name(), url = %request.url, error = %e, "cache write failed");
    }
}

/// Serve from `store_name` if present; otherwise fetch and cache a 200.
///
/// A network failure on miss yields the synthetic `503 Offline`.
pub async fn cache_first<S, N>(storage: &S, network: &N, store_name: &str, request: &Request) -> Response
where
    S: CacheStorage,
    N: Network + ?Sized,
{
    let store = open_store(storage, store_name).await;

    if let Some(cached) = lookup(store.as_ref(), request).await {
        tracing::debug!(store = store_name, url = %request.url, "cache hit");
        return cached;
    }
    tracing::debug!(store = store_name, url = %request.url, "cache miss");

    match network.fetch(request).await {
        Ok(response) => {
            store_if_cacheable(store.as_ref(), request, &response).await;
            response
        }
        Err(e) => {
            tracing::debug!(url = %request.url, error = %e, "network failed on cache miss, serving offline");
            Response::offline()
        }
    }
}

/// Fetch from the network, caching a 200 in `store_name`.
///
/// A network failure falls back to the stored copy (at its original
/// status), then to the synthetic `503 Offline`.
pub async fn network_first<S, N>(storage: &S, network: &N, store_name: &str, request: &Request) -> Response
where
    S: CacheStorage,
    N: Network + ?Sized,
{
    let store = open_store(storage, store_name).await;

    match network.fetch(request).await {
        Ok(response) => {
            store_if_cacheable(store.as_ref(), request, &response).await;
            response
        }
        Err(e) => match lookup(store.as_ref(), request).await {
            Some(stale) => {
                tracing::debug!(url = %request.url, error = %e, "network failed, serving stale copy");
                stale
            }
            None => {
                tracing::debug!(url = %request.url, error = %e, "network failed, nothing cached, serving offline");
                Response::offline()
            }
        },
    }
}

//! Offline cache controller.
//!
//! Mediates every intercepted request through a cache-aware policy and
//! manages cache generations across deploys.
//!
//! ### Lifecycle
//! - **install**: pre-populate the static store with the critical
//!   resources, all-or-nothing, then signal skip-waiting.
//! - **activate**: delete every store that is not a current generation,
//!   then signal claim-clients.
//! - **fetch**: classify the request and serve it cache-first,
//!   network-first, network-only, or not at all.
//!
//! ### Concurrency
//! Handlers are independent async operations and take no locks. Two
//! concurrent misses for the same key both fetch and both write; the
//! store's per-key upsert makes that last-write-wins. No timeouts are
//! enforced here; the `Network` implementation owns them.

pub mod classify;
pub mod config;
pub mod strategy;

pub use classify::{RequestPolicy, classify};
pub use config::{ControllerConfig, Generations};

use swcache_core::{CacheStorage, CacheStore, Error, Network, NetworkError, Request, Response};

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Store the critical resources were written to.
    pub store: String,
    /// URLs written, in install order.
    pub cached: Vec<String>,
    /// Activate without waiting for existing clients to close.
    pub skip_waiting: bool,
}

/// Result of a successful activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateOutcome {
    /// Stale stores removed, in listing order.
    pub deleted: Vec<String>,
    /// Take control of already-open clients immediately.
    pub claim_clients: bool,
}

/// What the host should do with an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// Not handled; the host performs its default fetch.
    Ignored,
    /// Answer the request with this response.
    Respond(Response),
}

impl Interception {
    pub fn response(&self) -> Option<&Response> {
        match self {
            Interception::Ignored => None,
            Interception::Respond(response) => Some(response),
        }
    }
}

/// Cache controller over a storage backend and a network.
pub struct CacheController<S, N> {
    storage: S,
    network: N,
    config: ControllerConfig,
}

impl<S, N> CacheController<S, N>
where
    S: CacheStorage,
    N: Network,
{
    pub fn new(storage: S, network: N, config: ControllerConfig) -> Self {
        Self { storage, network, config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Pre-populate the static store with the critical resources.
    ///
    /// # Errors
    ///
    /// Returns `Error::InstallFailed` if any critical resource cannot be
    /// resolved, fetched (network error or non-2xx), or stored. Nothing
    /// is written in that case and the new generation must not activate.
    pub async fn on_install(&self) -> Result<InstallOutcome, Error> {
        let store_name = &self.config.generations.static_cache;
        let requests = self
            .config
            .critical_requests()
            .map_err(|e| install_failed(Error::InvalidUrl(e.to_string())))?;

        let store = self.storage.open(store_name).await.map_err(install_failed)?;
        store.add_all(&self.network, &requests).await.map_err(|e| {
            tracing::warn!(store = %store_name, error = %e, "install failed");
            install_failed(e)
        })?;

        let cached: Vec<String> = requests.iter().map(|r| r.url.to_string()).collect();
        tracing::info!(store = %store_name, count = cached.len(), "installed critical resources");

        Ok(InstallOutcome { store: store_name.clone(), cached, skip_waiting: true })
    }

    /// Delete every store left over from a previous generation.
    pub async fn on_activate(&self) -> Result<ActivateOutcome, Error> {
        let generations = &self.config.generations;
        let mut deleted = Vec::new();

        for name in self.storage.keys().await? {
            if generations.is_current(&name) {
                continue;
            }
            if self.storage.delete(&name).await? {
                tracing::debug!(store = %name, "deleted stale cache store");
                deleted.push(name);
            }
        }

        tracing::info!(deleted = deleted.len(), "activated cache generation");
        Ok(ActivateOutcome { deleted, claim_clients: true })
    }

    /// Handle one intercepted request.
    ///
    /// # Errors
    ///
    /// Only the network-only bypass can fail: its `NetworkError` is handed
    /// back to the host unchanged. Cache-first and network-first always
    /// produce a response.
    pub async fn on_fetch(&self, request: &Request) -> Result<Interception, NetworkError> {
        let policy = self.classify(request);
        self.respond(policy, request).await
    }

    /// Policy this controller applies to `request`.
    pub fn classify(&self, request: &Request) -> RequestPolicy {
        classify::classify(request, &self.config)
    }

    /// Serve `request` under an already chosen policy.
    ///
    /// # Errors
    ///
    /// Same as [`CacheController::on_fetch`].
    pub async fn respond(&self, policy: RequestPolicy, request: &Request) -> Result<Interception, NetworkError> {
        tracing::debug!(method = %request.method, url = %request.url, %policy, "intercepted request");

        let generations = &self.config.generations;
        let response = match policy {
            RequestPolicy::Ignore => return Ok(Interception::Ignored),
            RequestPolicy::CacheFirst => {
                strategy::cache_first(&self.storage, &self.network, &generations.static_cache, request).await
            }
            RequestPolicy::NetworkFirst => {
                strategy::network_first(&self.storage, &self.network, &generations.dynamic_cache, request).await
            }
            RequestPolicy::NetworkOnly => self.network.fetch(request).await?,
        };

        Ok(Interception::Respond(response))
    }
}

fn install_failed(err: Error) -> Error {
    Error::InstallFailed(Box::new(err))
}

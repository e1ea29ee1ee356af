//! Named cache stores.
//!
//! The controller talks to storage only through two traits:
//!
//! - [`CacheStorage`]: the per-origin registry of named stores
//!   (`open`, `keys`, `delete`)
//! - [`CacheStore`]: one named store mapping requests to response snapshots
//!   (`match_request`, `put`, `put_all`, `add_all`)
//!
//! Two backends implement them:
//!
//! - [`CacheDb`]: persistent SQLite storage with async access via
//!   tokio-rusqlite, WAL mode and schema migrations
//! - [`MemoryStorage`]: an in-memory fake that counts interactions

pub mod connection;
pub mod entries;
pub mod hash;
pub mod memory;
pub mod migrations;
pub mod stores;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::SqliteStore;
pub use memory::{MemoryStorage, MemoryStore};

use async_trait::async_trait;

use crate::http::{Request, Response};
use crate::net::Network;

/// A single named cache store.
///
/// Writing the same key twice replaces the earlier entry (last write wins).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// The generation identifier this store was opened under.
    fn name(&self) -> &str;

    /// Look up the stored response for a request.
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error>;

    /// Store a response for a request.
    async fn put(&self, request: &Request, response: &Response) -> Result<(), Error>;

    /// Store several entries atomically: either all are written or none.
    async fn put_all(&self, entries: Vec<(Request, Response)>) -> Result<(), Error>;

    /// Fetch every request and store all responses.
    ///
    /// All-or-nothing: a network error or non-2xx status on any request
    /// aborts before anything is written.
    async fn add_all<N>(&self, network: &N, requests: &[Request]) -> Result<(), Error>
    where
        N: Network + ?Sized,
    {
        let mut entries = Vec::with_capacity(requests.len());
        for request in requests {
            let response = network
                .fetch(request)
                .await
                .map_err(|e| Error::AddAllFailed { url: request.url.to_string(), reason: e.to_string() })?;

            if !response.is_ok() {
                return Err(Error::AddAllFailed {
                    url: request.url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            entries.push((request.clone(), response));
        }

        self.put_all(entries).await
    }
}

/// Registry of named cache stores for one origin.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    type Store: CacheStore;

    /// Open a store, creating it if absent.
    async fn open(&self, name: &str) -> Result<Self::Store, Error>;

    /// Names of every existing store, in creation order.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a store and all its entries. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    /// Whether a store with this name exists.
    async fn has(&self, name: &str) -> Result<bool, Error> {
        Ok(self.keys().await?.iter().any(|key| key == name))
    }
}

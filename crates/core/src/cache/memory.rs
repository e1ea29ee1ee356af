//! In-memory cache storage.
//!
//! Same contract as the SQLite backend, with no persistence. Every storage
//! or store call bumps a shared interaction counter so tests can assert
//! that a code path never touched the cache at all.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheStorage, CacheStore};
use crate::Error;
use crate::http::{Request, Response};

type Entries = Arc<RwLock<HashMap<String, Response>>>;

/// In-memory [`CacheStorage`].
///
/// Clones share the same underlying stores.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    stores: Arc<RwLock<Vec<(String, Entries)>>>,
    interactions: Arc<AtomicUsize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total storage and store calls made so far.
    pub fn interactions(&self) -> usize {
        self.interactions.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.interactions.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    type Store = MemoryStore;

    async fn open(&self, name: &str) -> Result<MemoryStore, Error> {
        self.touch();
        if name.is_empty() {
            return Err(Error::InvalidInput("cache store name must not be empty".into()));
        }

        let mut stores = self.stores.write().await;
        let entries = match stores.iter().find(|(n, _)| n == name) {
            Some((_, entries)) => entries.clone(),
            None => {
                let entries = Entries::default();
                stores.push((name.to_string(), entries.clone()));
                entries
            }
        };

        Ok(MemoryStore { name: name.to_string(), entries, interactions: self.interactions.clone() })
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.touch();
        Ok(self.stores.read().await.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        self.touch();
        let mut stores = self.stores.write().await;
        let before = stores.len();
        stores.retain(|(n, _)| n != name);
        Ok(stores.len() < before)
    }
}

/// One named in-memory store.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    name: String,
    entries: Entries,
    interactions: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn touch(&self) {
        self.interactions.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        self.touch();
        Ok(self.entries.read().await.get(&request.cache_key()).cloned())
    }

    async fn put(&self, request: &Request, response: &Response) -> Result<(), Error> {
        self.touch();
        self.entries
            .write()
            .await
            .insert(request.cache_key(), response.clone());
        Ok(())
    }

    async fn put_all(&self, entries: Vec<(Request, Response)>) -> Result<(), Error> {
        self.touch();
        let mut map = self.entries.write().await;
        for (request, response) in entries {
            map.insert(request.cache_key(), response);
        }
        Ok(())
    }
}

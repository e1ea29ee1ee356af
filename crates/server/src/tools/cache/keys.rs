//! cache_keys tool implementation.
//!
//! Lists every cache store and whether it belongs to the current generation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::Generations;
use swcache_core::CacheStorage;

use crate::tools::json_result;

/// One store in the cache_keys output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreInfo {
    pub name: String,
    /// False for stores the next activation will delete.
    pub current: bool,
}

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    /// Stores in creation order.
    pub stores: Vec<StoreInfo>,
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl<S: CacheStorage>(storage: &S, generations: &Generations) -> Result<CallToolResult, McpError> {
    let stores = storage
        .keys()
        .await?
        .into_iter()
        .map(|name| StoreInfo { current: generations.is_current(&name), name })
        .collect();

    json_result(&CacheKeysOutput { stores })
}

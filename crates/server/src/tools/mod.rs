//! MCP tool implementations.
//!
//! This module contains all tools exposed by the sw-host server. Each tool
//! has a generic `*_impl` function so it can run against in-memory storage
//! and a mock network in tests.

pub mod cache;
pub mod lifecycle;
pub mod sw_fetch;

pub use lifecycle::{Lifecycle, activate_impl, install_impl};
pub use sw_fetch::{SwFetchParams, fetch_impl};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use swcache_core::Error;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

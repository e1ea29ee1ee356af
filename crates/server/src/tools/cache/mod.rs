//! Cache inspection MCP tools.
//!
//! Read-only views over the cache storage the controller writes to.

pub mod get;
pub mod keys;

pub use get::{CacheGetParams, get_impl};
pub use keys::keys_impl;

//! Core types and shared functionality for swcache.
//!
//! This crate provides:
//! - Request/response snapshot types
//! - The `Network` seam and a scriptable mock
//! - Cache storage traits with SQLite and in-memory backends
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod net;

pub use cache::{CacheDb, CacheStorage, CacheStore, MemoryStorage};
pub use config::AppConfig;
pub use error::Error;
pub use http::{Request, Response};
pub use net::{MockNetwork, Network, NetworkError};

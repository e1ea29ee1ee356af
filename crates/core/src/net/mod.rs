//! The network seam.
//!
//! Every network round-trip the controller makes goes through [`Network`],
//! so tests can swap the real HTTP client for [`MockNetwork`]. A failed
//! fetch is a typed [`NetworkError`], never a panic, which keeps both
//! fallback paths (stale cache vs. synthetic offline) explicit at the
//! call site.

pub mod mock;

pub use mock::MockNetwork;

use async_trait::async_trait;

use crate::http::{Request, Response};

/// Errors from a single network fetch attempt.
///
/// An HTTP error status is not a `NetworkError`; it arrives as a normal
/// [`Response`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Could not connect (offline, DNS failure, refused).
    #[error("connect failed: {0}")]
    Connect(String),

    /// The request timed out in the host's client.
    #[error("request timeout")]
    Timeout,

    /// Response body exceeded the configured limit.
    #[error("response too large: {size} bytes exceeds {limit}")]
    TooLarge { size: usize, limit: usize },

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// Issues a single network fetch for a request.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}

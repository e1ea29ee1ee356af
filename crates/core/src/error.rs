//! Unified error types for swcache.
//!
//! Each variant carries a stable code prefix so host logs and tool
//! responses stay grep-able.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::net::NetworkError;

/// Unified error types for the cache controller and its storage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// No entry stored for the given request.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored entry could not be decoded.
    #[error("CACHE_ERROR: corrupt entry: {0}")]
    CorruptEntry(String),

    /// Bulk add aborted because one of the requests could not be fetched.
    #[error("ADD_ALL_FAILED: {url}: {reason}")]
    AddAllFailed { url: String, reason: String },

    /// Install step failed; the new generation must not activate.
    #[error("INSTALL_FAILED: {0}")]
    InstallFailed(Box<Error>),

    /// Network fetch failed outside any fallback path.
    #[error("NETWORK_ERROR: {0}")]
    Network(#[from] NetworkError),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::CacheMiss(_) => -32001,
            Error::Database(_) | Error::MigrationFailed(_) | Error::CorruptEntry(_) => -32002,
            Error::InvalidUrl(_) => -32003,
            Error::AddAllFailed { .. } | Error::InstallFailed(_) => -32020,
            Error::Network(_) => -32021,
        };
        let message = match err {
            Error::InvalidInput(msg) | Error::CacheMiss(msg) | Error::InvalidUrl(msg) => msg,
            other => other.to_string(),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

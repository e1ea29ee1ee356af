//! Structured errors for the sw-host server.
//!
//! Core errors convert to MCP errors in `swcache-core`; these cover what
//! only the host glue can get wrong.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use swcache_client::UrlError;
use swcache_core::NetworkError;

use crate::tools::lifecycle::Phase;

/// Structured errors for the sw-host server.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Activation requested before a successful install.
    #[error("INSTALL_FAILED: cannot activate while {0}")]
    NotInstalled(Phase),

    /// A network-only request failed; there is no fallback for it.
    #[error("NETWORK_ERROR: {0}")]
    Network(#[from] NetworkError),
}

impl From<UrlError> for HostError {
    fn from(err: UrlError) -> Self {
        HostError::InvalidInput(err.to_string())
    }
}

impl From<HostError> for McpError {
    fn from(err: HostError) -> Self {
        let (code, message) = match &err {
            HostError::InvalidInput(msg) => (-32602, msg.clone()),
            HostError::NotInstalled(_) => (-32020, err.to_string()),
            HostError::Network(e) => (-32021, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_error_is_invalid_input() {
        let err: McpError = HostError::from(UrlError::Empty).into();
        assert_eq!(err.code.0, -32602);
        assert_eq!(err.message, "empty URL");
    }

    #[test]
    fn test_network_error_code() {
        let err: McpError = HostError::from(NetworkError::Timeout).into();
        assert_eq!(err.code.0, -32021);
        assert_eq!(err.message, "request timeout");
    }

    #[test]
    fn test_not_installed_shares_install_code() {
        let err: McpError = HostError::NotInstalled(Phase::InstallFailed).into();
        assert_eq!(err.code.0, -32020);
        assert_eq!(err.message, "INSTALL_FAILED: cannot activate while install_failed");
    }
}

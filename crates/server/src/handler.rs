//! MCP server handler implementation.
//!
//! This module binds the controller's lifecycle to MCP tool calls: the
//! host agent delivers install, activate and fetch signals as tools, and
//! can inspect the cache stores the controller maintains.
use std::sync::Arc;

use crate::tools::cache::{CacheGetParams, get_impl, keys_impl};
use crate::tools::{Lifecycle, SwFetchParams, activate_impl, fetch_impl, install_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use swcache_client::{CacheController, FetchClient};
use swcache_core::CacheDb;

/// The controller as wired in production.
pub type Controller = CacheController<CacheDb, FetchClient>;

/// The main MCP server handler for sw-host.
#[derive(Clone)]
pub struct SwHost {
    tool_router: ToolRouter<Self>,
    controller: Arc<Controller>,
    lifecycle: Arc<Lifecycle>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SwHost {
    /// Create a new server handler around a shared controller.
    pub fn new(controller: Arc<Controller>) -> Self {
        Self { tool_router: Self::tool_router(), controller, lifecycle: Arc::new(Lifecycle::new()) }
    }

    #[tool(
        description = "Run the install step: fetch the critical resources into the static cache store. Fails as a whole if any resource cannot be cached."
    )]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(self.controller.as_ref(), &self.lifecycle).await
    }

    #[tool(
        description = "Run the activate step: delete every cache store that is not part of the current generation. Refused unless the last install succeeded."
    )]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(self.controller.as_ref(), &self.lifecycle).await
    }

    #[tool(
        description = "Intercept a request the way the offline cache would: cache-first for static assets and fonts, network-first for documents, plain network for other origins. Left to the host until the generation is activated."
    )]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(self.controller.as_ref(), &self.lifecycle, params.0).await
    }

    #[tool(description = "List cache stores and whether each belongs to the current generation.")]
    async fn cache_keys(&self) -> Result<CallToolResult, McpError> {
        keys_impl(self.controller.storage(), &self.controller.config().generations).await
    }

    #[tool(description = "Read a stored response from a cache store by URL. Does not touch the network.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.controller.storage(), &self.controller.config().origin, params.0).await
    }
}

impl ServerHandler for SwHost {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "sw-host".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swcache_client::{ControllerConfig, FetchConfig};
    use url::Url;

    async fn host() -> SwHost {
        let storage = CacheDb::open_in_memory().await.unwrap();
        let network = FetchClient::new(FetchConfig::default()).unwrap();
        let config = ControllerConfig::new(Url::parse("https://portfolio.example").unwrap());
        SwHost::new(Arc::new(CacheController::new(storage, network, config)))
    }

    #[tokio::test]
    async fn test_all_tools_registered() {
        let host = host().await;
        let mut names: Vec<String> = host.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["cache_get", "cache_keys", "sw_activate", "sw_fetch", "sw_install"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let info = host().await.get_info();
        assert_eq!(info.server_info.name, "sw-host");
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_new_host_does_not_control_fetches() {
        let host = host().await;
        assert_eq!(host.lifecycle.phase().await, crate::tools::lifecycle::Phase::Pending);
        assert!(!host.lifecycle.is_controlling().await);
        assert!(host.sw_activate().await.is_err());
    }
}

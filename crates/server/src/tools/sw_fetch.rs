//! sw_fetch tool implementation.
//!
//! Delivers one fetch interception to the controller and reports how it
//! was answered. Until the current generation is activated the controller
//! does not control the host, and requests are left to the host's own
//! fetch.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::{CacheController, Interception, resolve};
use swcache_core::{CacheStorage, Network, Request};

use super::json_result;
use super::lifecycle::Lifecycle;
use crate::error::HostError;

/// Bodies longer than this are truncated in the tool output.
const MAX_BODY_PREVIEW: usize = 64 * 1024;

/// Parameters for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Absolute URL or origin-relative path (e.g. "/about").
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output from the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    /// Resolved request URL.
    pub url: String,
    pub method: String,
    /// Retrieval policy chosen for the request.
    pub policy: String,
    /// False until the generation has activated.
    pub controlled: bool,
    /// False when the controller left the request to the host.
    pub intercepted: bool,
    pub status: Option<u16>,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Body as UTF-8 (lossy), truncated to 64KB.
    pub body: Option<String>,
    /// Full body length in bytes.
    pub body_len: usize,
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl<S, N>(
    controller: &CacheController<S, N>, lifecycle: &Lifecycle, params: SwFetchParams,
) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    if params.method.trim().is_empty() {
        return Err(HostError::InvalidInput("method cannot be empty".into()).into());
    }

    let url = resolve(&controller.config().origin, &params.url).map_err(HostError::from)?;
    let request = Request::new(&params.method, url);
    let policy = controller.classify(&request);
    let controlled = lifecycle.is_controlling().await;

    let mut output = SwFetchOutput {
        url: request.url.to_string(),
        method: request.method.clone(),
        policy: policy.to_string(),
        controlled,
        intercepted: false,
        status: None,
        headers: Vec::new(),
        body: None,
        body_len: 0,
    };

    if !controlled {
        tracing::debug!(url = %request.url, "generation not active, leaving request to host");
        return json_result(&output);
    }

    let interception = controller.respond(policy, &request).await.map_err(HostError::from)?;
    if let Interception::Respond(response) = interception {
        let preview = &response.body[..response.body.len().min(MAX_BODY_PREVIEW)];
        output.intercepted = true;
        output.status = Some(response.status);
        output.body = Some(String::from_utf8_lossy(preview).into_owned());
        output.body_len = response.body.len();
        output.headers = response.headers;
    }

    json_result(&output)
}

//! sw_install / sw_activate tool implementations.
//!
//! Deliver the install and activate lifecycle signals to the controller.
//! The host tracks which phase the current generation reached: activation
//! is refused unless the last install succeeded, and fetches are only
//! intercepted once the generation is active.

use std::fmt;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::CacheController;
use swcache_core::{CacheStorage, Network};
use tokio::sync::RwLock;

use super::json_result;
use crate::error::HostError;

/// How far the current generation got through its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No install attempted yet.
    #[default]
    Pending,
    Installing,
    Installed,
    /// The last install failed; the generation must not activate.
    InstallFailed,
    Activated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Pending => "pending",
            Phase::Installing => "installing",
            Phase::Installed => "installed",
            Phase::InstallFailed => "install_failed",
            Phase::Activated => "activated",
        };
        f.write_str(name)
    }
}

/// Shared lifecycle state for one host.
#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: RwLock<Phase>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    /// Whether fetches are routed through the controller.
    pub async fn is_controlling(&self) -> bool {
        self.phase().await == Phase::Activated
    }

    /// Mark an install as started and return the phase it replaces.
    async fn begin_install(&self) -> Phase {
        let mut phase = self.phase.write().await;
        let previous = *phase;
        if previous != Phase::Activated {
            *phase = Phase::Installing;
        }
        previous
    }

    /// Record the install result. An active generation stays active.
    async fn finish_install(&self, succeeded: bool) {
        let mut phase = self.phase.write().await;
        if *phase == Phase::Activated {
            return;
        }
        *phase = if succeeded { Phase::Installed } else { Phase::InstallFailed };
    }
}

/// Output from the sw_install tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwInstallOutput {
    /// Store the critical resources were written to.
    pub store: String,
    /// URLs written into the store.
    pub cached: Vec<String>,
    /// The new generation may activate without waiting for open clients.
    pub skip_waiting: bool,
    /// Lifecycle phase after the install.
    pub phase: Phase,
}

/// Output from the sw_activate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwActivateOutput {
    /// Stale stores that were deleted.
    pub deleted: Vec<String>,
    /// The controller takes over already-open clients.
    pub claim_clients: bool,
    pub phase: Phase,
}

/// Implementation of the sw_install tool.
pub async fn install_impl<S, N>(controller: &CacheController<S, N>, lifecycle: &Lifecycle) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    let previous = lifecycle.begin_install().await;
    tracing::debug!(%previous, "install requested");

    let result = controller.on_install().await;
    lifecycle.finish_install(result.is_ok()).await;
    let outcome = result?;

    json_result(&SwInstallOutput {
        store: outcome.store,
        cached: outcome.cached,
        skip_waiting: outcome.skip_waiting,
        phase: lifecycle.phase().await,
    })
}

/// Implementation of the sw_activate tool.
pub async fn activate_impl<S, N>(
    controller: &CacheController<S, N>, lifecycle: &Lifecycle,
) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    let mut phase = lifecycle.phase.write().await;
    if !matches!(*phase, Phase::Installed | Phase::Activated) {
        tracing::warn!(phase = %*phase, "activation refused");
        return Err(HostError::NotInstalled(*phase).into());
    }

    let outcome = controller.on_activate().await?;
    *phase = Phase::Activated;

    json_result(&SwActivateOutput { deleted: outcome.deleted, claim_clients: outcome.claim_clients, phase: *phase })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::parse_output;
    use swcache_client::ControllerConfig;
    use swcache_core::{MemoryStorage, MockNetwork};
    use url::Url;

    fn controller(storage: MemoryStorage, network: MockNetwork) -> CacheController<MemoryStorage, MockNetwork> {
        CacheController::new(storage, network, ControllerConfig::new(Url::parse("https://portfolio.example").unwrap()))
    }

    fn site_network() -> MockNetwork {
        MockNetwork::new()
            .with_body("https://portfolio.example/", "<html>")
            .with_body("https://portfolio.example/favicon.ico", "ico")
    }

    async fn previous_generation() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.open("static-v1").await.unwrap();
        storage.open("dynamic-v1").await.unwrap();
        storage
    }

    #[tokio::test]
    async fn test_install_impl() {
        let sw = controller(MemoryStorage::new(), site_network());
        let lifecycle = Lifecycle::new();

        let result = install_impl(&sw, &lifecycle).await.unwrap();
        let output: SwInstallOutput = parse_output(&result);

        assert_eq!(output.store, "static-v2");
        assert_eq!(output.cached.len(), 2);
        assert!(output.skip_waiting);
        assert_eq!(output.phase, Phase::Installed);
    }

    #[tokio::test]
    async fn test_install_impl_failure_is_error() {
        let sw = controller(MemoryStorage::new(), MockNetwork::offline());
        let lifecycle = Lifecycle::new();

        let err = install_impl(&sw, &lifecycle).await.unwrap_err();

        assert_eq!(err.code.0, -32020);
        assert_eq!(lifecycle.phase().await, Phase::InstallFailed);
    }

    #[tokio::test]
    async fn test_activate_impl() {
        let storage = previous_generation().await;
        let sw = controller(storage.clone(), site_network());
        let lifecycle = Lifecycle::new();

        install_impl(&sw, &lifecycle).await.unwrap();
        let result = activate_impl(&sw, &lifecycle).await.unwrap();
        let output: SwActivateOutput = parse_output(&result);

        assert_eq!(output.deleted, vec!["static-v1", "dynamic-v1"]);
        assert!(output.claim_clients);
        assert_eq!(output.phase, Phase::Activated);
        assert!(lifecycle.is_controlling().await);
    }

    #[tokio::test]
    async fn test_activate_after_failed_install_keeps_previous_generation() {
        let storage = previous_generation().await;
        let sw = controller(storage.clone(), MockNetwork::offline());
        let lifecycle = Lifecycle::new();

        assert!(install_impl(&sw, &lifecycle).await.is_err());
        let err = activate_impl(&sw, &lifecycle).await.unwrap_err();

        assert_eq!(err.code.0, -32020);
        let keys = storage.keys().await.unwrap();
        assert!(keys.contains(&"static-v1".to_string()));
        assert!(keys.contains(&"dynamic-v1".to_string()));
        assert!(!lifecycle.is_controlling().await);
    }

    #[tokio::test]
    async fn test_activate_without_install_refused() {
        let storage = previous_generation().await;
        let sw = controller(storage.clone(), site_network());
        let lifecycle = Lifecycle::new();

        assert!(activate_impl(&sw, &lifecycle).await.is_err());
        assert_eq!(storage.keys().await.unwrap(), vec!["static-v1", "dynamic-v1"]);
        assert_eq!(lifecycle.phase().await, Phase::Pending);
    }

    #[tokio::test]
    async fn test_retry_after_failed_install_can_activate() {
        let storage = previous_generation().await;
        let sw = controller(storage.clone(), site_network());
        let lifecycle = Lifecycle::new();

        sw.network().set_offline(true);
        assert!(install_impl(&sw, &lifecycle).await.is_err());

        sw.network().set_offline(false);
        install_impl(&sw, &lifecycle).await.unwrap();
        activate_impl(&sw, &lifecycle).await.unwrap();

        assert_eq!(storage.keys().await.unwrap(), vec!["static-v2"]);
    }

    #[tokio::test]
    async fn test_failed_reinstall_keeps_active_generation() {
        let sw = controller(MemoryStorage::new(), site_network());
        let lifecycle = Lifecycle::new();
        install_impl(&sw, &lifecycle).await.unwrap();
        activate_impl(&sw, &lifecycle).await.unwrap();

        sw.network().set_offline(true);
        assert!(install_impl(&sw, &lifecycle).await.is_err());

        assert_eq!(lifecycle.phase().await, Phase::Activated);
    }
}

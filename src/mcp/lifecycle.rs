//! Submission lifecycle for the MCP server configuration.
//!
//! Every mutation of the registry is a sequential, awaited round-trip to
//! the config write endpoint: serialize the registry, run the raw document
//! through the path resolver, send it, then reconcile the registry against
//! the backend's verdict. Servers the backend reports as failed are
//! administratively disabled in place; nothing here removes an entry.
//!
//! Failure reporting follows the severity of the cause: a server-specific
//! startup failure produces one named notice per server, an unreachable or
//! unparsable endpoint produces a single generic notice and leaves the
//! registry untouched.

use crate::core::message::Message;
use crate::mcp::catalog::{CatalogStore, ToolCatalog};
use crate::mcp::config::McpRegistry;
use crate::mcp::endpoint::{
    ConfigEndpoint, PathResolver, ServerError, ToolDescriptor, ToolsEndpoint,
    UpdateConfigResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of one submission: the backend's aggregate verdict, the
/// per-server failures, and the notices to surface in the transcript.
#[derive(Debug, Default)]
pub struct SubmitReport {
    pub success: bool,
    pub errors: Vec<ServerError>,
    pub notices: Vec<Message>,
}

impl SubmitReport {
    fn failed(notice: Message) -> Self {
        SubmitReport {
            success: false,
            errors: Vec::new(),
            notices: vec![notice],
        }
    }
}

/// Drives the configuration lifecycle against the backend endpoints.
///
/// Operations are meant to run one at a time from a single cooperative
/// context; concurrent mutations of the same registry are not coordinated.
pub struct LifecycleController {
    config_endpoint: Arc<dyn ConfigEndpoint>,
    tools_endpoint: Arc<dyn ToolsEndpoint>,
    path_resolver: Arc<dyn PathResolver>,
}

impl LifecycleController {
    pub fn new(
        config_endpoint: Arc<dyn ConfigEndpoint>,
        tools_endpoint: Arc<dyn ToolsEndpoint>,
        path_resolver: Arc<dyn PathResolver>,
    ) -> Self {
        Self {
            config_endpoint,
            tools_endpoint,
            path_resolver,
        }
    }

    /// Submit the full registry to the backend.
    ///
    /// On an aggregate success, every server named in the backend's error
    /// list is marked `disabled` in the registry and surfaced as a named
    /// notice; an empty error list yields one success notice. A transport
    /// failure or an aggregate rejection leaves the registry untouched and
    /// yields one generic notice.
    pub async fn submit(&self, registry: &mut McpRegistry, force: bool) -> SubmitReport {
        let response = match self.send_registry(registry, force).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "MCP configuration submission failed");
                return SubmitReport::failed(Message::app_error(format!(
                    "MCP server update failed: {err}"
                )));
            }
        };

        if !response.success {
            let reason = response
                .message
                .unwrap_or_else(|| "the endpoint rejected the configuration".to_string());
            warn!(reason = %reason, "MCP configuration rejected");
            return SubmitReport::failed(Message::app_error(format!(
                "MCP server update failed: {reason}"
            )));
        }

        let mut notices = Vec::new();
        if response.errors.is_empty() {
            notices.push(Message::app_info("MCP server configuration saved."));
        } else {
            for error in &response.errors {
                debug!(server = %error.server_name, error = %error.error, "MCP server failed to start");
                if let Some(server) = registry.find_mut(&error.server_name) {
                    server.disabled = Some(true);
                }
                notices.push(Message::app_error(format!(
                    "MCP server {} failed: {}",
                    error.server_name, error.error
                )));
            }
        }

        SubmitReport {
            success: true,
            errors: response.errors,
            notices,
        }
    }

    /// Flip a server's `enabled` flag and submit the whole registry.
    ///
    /// When the backend's error list names the toggled server, one
    /// compensating submission follows that forces `enabled = false,
    /// disabled = true` for every server in the error list. The
    /// compensating submission is best-effort: its own result is not
    /// inspected, so a failure there can leave the backend out of step
    /// until the next submission.
    pub async fn toggle(&self, registry: &mut McpRegistry, name: &str) -> SubmitReport {
        let Some(server) = registry.find_mut(name) else {
            return SubmitReport::failed(Message::app_error(format!(
                "Unknown MCP server: {name}"
            )));
        };
        let previous = server.enabled;
        server.enabled = Some(!server.is_enabled());

        let report = self.submit(registry, false).await;
        if !report.success {
            // The attempted operation aborts; put the flag back.
            if let Some(server) = registry.find_mut(name) {
                server.enabled = previous;
            }
            return report;
        }

        let rejected = report
            .errors
            .iter()
            .any(|error| error.server_name.eq_ignore_ascii_case(name));
        if rejected {
            for error in &report.errors {
                if let Some(server) = registry.find_mut(&error.server_name) {
                    server.enabled = Some(false);
                    server.disabled = Some(true);
                }
            }
            if let Err(err) = self.send_registry(registry, false).await {
                warn!(error = %err, "compensating MCP submission failed");
            }
        }

        report
    }

    /// Re-submit the current registry with the force flag set, asking the
    /// backend to reload servers that are already running.
    pub async fn reload(&self, registry: &mut McpRegistry) -> SubmitReport {
        self.submit(registry, true).await
    }

    /// Read the configuration from the backend and build a registry from
    /// it, applying the same validation and defaulting as a merge.
    pub async fn fetch(&self) -> Result<McpRegistry, String> {
        let response = self.config_endpoint.read_config().await?;
        if !response.success {
            return Err(response
                .message
                .unwrap_or_else(|| "failed to load the MCP server configuration".to_string()));
        }
        let servers = response.config.map(|doc| doc.servers).unwrap_or_default();
        Ok(McpRegistry::from_wire(&servers))
    }

    /// Fetch the live tool listing and fold it into the catalog.
    ///
    /// On success the catalog is refreshed and persisted through `store`;
    /// a persistence failure is logged but does not fail the refresh,
    /// since the in-memory catalog is already current. Returns the live
    /// listing for display resolution plus any notices.
    pub async fn refresh_catalog(
        &self,
        catalog: &mut ToolCatalog,
        store: &dyn CatalogStore,
    ) -> (Vec<ToolDescriptor>, Vec<Message>) {
        let listing = match self.tools_endpoint.list_tools().await {
            Ok(listing) => listing,
            Err(err) => {
                warn!(error = %err, "MCP tool listing failed");
                return (
                    Vec::new(),
                    vec![Message::app_error(format!("Failed to fetch tools: {err}"))],
                );
            }
        };

        if !listing.success {
            let reason = listing
                .message
                .unwrap_or_else(|| "the endpoint rejected the request".to_string());
            return (
                Vec::new(),
                vec![Message::app_error(format!("Failed to fetch tools: {reason}"))],
            );
        }

        catalog.refresh(&listing.tools);
        if let Err(err) = catalog.persist(store) {
            warn!(error = %err, "failed to persist the tool catalog");
        }
        (listing.tools, Vec::new())
    }

    /// Serialize the registry, run it through the path resolver, and send
    /// it to the write endpoint.
    async fn send_registry(
        &self,
        registry: &McpRegistry,
        force: bool,
    ) -> Result<UpdateConfigResponse, String> {
        let servers = serde_json::to_value(registry).map_err(|err| err.to_string())?;
        let mut document = serde_json::Map::new();
        document.insert("servers".to_string(), servers);
        let raw = serde_json::to_string(&document).map_err(|err| err.to_string())?;
        let filled = self.path_resolver.fill_paths(&raw).await?;
        let config: Value = serde_json::from_str(&filled)
            .map_err(|err| format!("path resolution produced invalid JSON: {err}"))?;
        self.config_endpoint.write_config(&config, force).await
    }
}

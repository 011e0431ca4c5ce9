//! Boundary collaborators for the MCP lifecycle.
//!
//! The lifecycle layer does not own a backend: reading and writing the
//! server configuration, listing live tools, and resolving filesystem
//! paths in a raw configuration string all happen behind the traits here.
//! [`http::HttpEndpoint`] adapts them to the HTTP shape the hosting
//! client's backend exposes; tests substitute in-memory fakes.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One per-server failure reported by the config write endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    pub error: String,
    #[serde(rename = "serverName")]
    pub server_name: String,
}

/// Response to a configuration write. `success` is the aggregate outcome;
/// `errors` names the servers the backend could not bring up.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConfigResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ServerError>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The `config` document inside a read response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServersDocument {
    #[serde(default)]
    pub servers: Map<String, Value>,
}

/// Response to a configuration read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadConfigResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub config: Option<ServersDocument>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One sub-tool in a tool listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One live tool-provider in a tool listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tools: Vec<SubToolDescriptor>,
}

/// Response to a tool listing request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolListing {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Read and write the MCP server configuration.
#[async_trait]
pub trait ConfigEndpoint: Send + Sync {
    async fn read_config(&self) -> Result<ReadConfigResponse, String>;

    /// Write the full configuration. `config` is the `{servers: map}`
    /// document; `force` asks the backend to also reload servers that are
    /// already running.
    async fn write_config(&self, config: &Value, force: bool)
        -> Result<UpdateConfigResponse, String>;
}

/// List the currently discoverable tool-providers.
#[async_trait]
pub trait ToolsEndpoint: Send + Sync {
    async fn list_tools(&self) -> Result<ToolListing, String>;
}

/// Resolve relative filesystem paths inside a raw configuration string.
///
/// Invoked on the serialized configuration before every submission. The
/// transformation is opaque to the caller; the output must be an
/// equivalent configuration document.
#[async_trait]
pub trait PathResolver: Send + Sync {
    async fn fill_paths(&self, raw: &str) -> Result<String, String>;
}

/// Pass-through resolver for hosts without path resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPathResolver;

#[async_trait]
impl PathResolver for IdentityPathResolver {
    async fn fill_paths(&self, raw: &str) -> Result<String, String> {
        Ok(raw.to_string())
    }
}

//! MCP server configuration: entries, the ordered registry, and fragment
//! merging.
//!
//! Server configuration travels as JSON maps keyed by server name, either
//! bare (`{"fetch": {...}}`) or wrapped (`{"servers": {"fetch": {...}}}`).
//! Both shapes normalize to the same thing before merging. The registry
//! preserves insertion order, which downstream display code treats as the
//! display order.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Transport assumed for a remote server that does not name one.
pub const DEFAULT_REMOTE_TRANSPORT: &str = "sse";

/// One configured MCP server.
///
/// A server launches either locally (`command` + `args`) or remotely
/// (`url` + `transport`). `enabled` records user intent; `disabled` is the
/// administrative flag the lifecycle layer sets when the backend reports
/// the server failed, and nothing else writes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpServerConfig {
    /// The registry key. Carried in memory only; on the wire the name is
    /// the enclosing map key.
    #[serde(skip)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl McpServerConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    /// Field-level union: fields the fragment set overwrite, fields it left
    /// out are preserved.
    fn merge_from(&mut self, incoming: McpServerConfig) {
        if let Some(command) = incoming.command {
            self.command = Some(command);
        }
        if let Some(args) = incoming.args {
            self.args = Some(args);
        }
        if let Some(url) = incoming.url {
            self.url = Some(url);
        }
        if let Some(transport) = incoming.transport {
            self.transport = Some(transport);
        }
        if let Some(env) = incoming.env {
            self.env = Some(env);
        }
        if let Some(headers) = incoming.headers {
            self.headers = Some(headers);
        }
        if let Some(enabled) = incoming.enabled {
            self.enabled = Some(enabled);
        }
        if let Some(disabled) = incoming.disabled {
            self.disabled = Some(disabled);
        }
    }
}

/// Ordered collection of configured servers, keyed by unique name.
///
/// Name lookup is ASCII-case-insensitive; the stored name keeps its
/// original spelling. Iteration order is insertion order. No operation
/// here removes an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct McpRegistry {
    servers: Vec<McpServerConfig>,
}

impl McpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn servers(&self) -> &[McpServerConfig] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&McpServerConfig> {
        self.servers
            .iter()
            .find(|server| server.name.eq_ignore_ascii_case(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut McpServerConfig> {
        self.servers
            .iter_mut()
            .find(|server| server.name.eq_ignore_ascii_case(name))
    }

    /// Merge a configuration fragment into the registry.
    ///
    /// The fragment is a JSON object, either a bare name-to-server map or
    /// the same map wrapped under a `servers` key. Candidates that have
    /// neither a local launch (`command` + `args`) nor a remote one
    /// (`url`) are dropped without failing the merge. Accepted entries get
    /// their defaults applied: remote entries without a transport use
    /// [`DEFAULT_REMOTE_TRANSPORT`], and entries that never stated an
    /// `enabled` preference start enabled.
    pub fn merge_fragment(&mut self, fragment: &Value) {
        let Some(object) = fragment.as_object() else {
            debug!("ignoring non-object MCP config fragment");
            return;
        };

        let entries = match object.get("servers").and_then(Value::as_object) {
            Some(wrapped) => wrapped,
            None => object,
        };

        for (name, candidate) in entries {
            self.merge_candidate(name, candidate);
        }
    }

    /// Build a registry from the `servers` map returned by the config read
    /// endpoint, applying the same validation and defaulting as a merge.
    pub fn from_wire(servers: &Map<String, Value>) -> Self {
        let mut registry = McpRegistry::new();
        for (name, candidate) in servers {
            registry.merge_candidate(name, candidate);
        }
        registry
    }

    fn merge_candidate(&mut self, name: &str, candidate: &Value) {
        let Some(fields) = candidate.as_object() else {
            debug!(server = %name, "dropping non-object server candidate");
            return;
        };

        let launchable = (fields.contains_key("command") && fields.contains_key("args"))
            || fields.contains_key("url");
        if !launchable {
            debug!(server = %name, "dropping server candidate without launch fields");
            return;
        }

        let mut incoming: McpServerConfig = match serde_json::from_value(candidate.clone()) {
            Ok(config) => config,
            Err(err) => {
                debug!(server = %name, error = %err, "dropping malformed server candidate");
                return;
            }
        };
        incoming.name = name.to_string();
        if incoming.url.is_some() && incoming.transport.is_none() {
            incoming.transport = Some(DEFAULT_REMOTE_TRANSPORT.to_string());
        }

        match self.find_mut(name) {
            Some(existing) => existing.merge_from(incoming),
            None => {
                if incoming.enabled.is_none() {
                    incoming.enabled = Some(true);
                }
                self.servers.push(incoming);
            }
        }
    }
}

/// The registry serializes to the wire map shape: `{name: entry, ...}` in
/// registry order.
impl Serialize for McpRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.servers.len()))?;
        for server in &self.servers {
            map.serialize_entry(&server.name, server)?;
        }
        map.end()
    }
}

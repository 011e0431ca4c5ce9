//! Persisted descriptive metadata for tool-providers.
//!
//! The tool listing only covers servers the backend can currently reach. So
//! that a configured-but-unreachable server still shows its description and
//! sub-tools, every successful listing is folded into a catalog keyed by
//! server name and persisted wholesale as one JSON blob. Entries are
//! overwritten on refresh and never evicted; a stale description beats no
//! description.
//!
//! Display resolution prefers live data over the catalog and the catalog
//! over nothing, but display *order* always comes from the registry.

use crate::mcp::config::McpRegistry;
use crate::mcp::endpoint::ToolDescriptor;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Cached metadata for one server's tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, rename = "subTools")]
    pub sub_tools: Vec<SubTool>,
}

/// What the tools overlay shows for one registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayEntry {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub enabled: bool,
    pub disabled: bool,
    pub sub_tools: Vec<SubTool>,
}

/// Errors from reading or writing the persisted catalog blob.
#[derive(Debug)]
pub enum CatalogStoreError {
    /// Failed to read the catalog file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the catalog file to disk.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The stored blob was not a valid catalog document.
    Parse { source: serde_json::Error },
}

impl fmt::Display for CatalogStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogStoreError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read tool catalog at {}: {}",
                    path.display(),
                    source
                )
            }
            CatalogStoreError::Write { path, source } => {
                write!(
                    f,
                    "Failed to write tool catalog at {}: {}",
                    path.display(),
                    source
                )
            }
            CatalogStoreError::Parse { source } => {
                write!(f, "Failed to parse tool catalog: {}", source)
            }
        }
    }
}

impl StdError for CatalogStoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CatalogStoreError::Read { source, .. } => Some(source),
            CatalogStoreError::Write { source, .. } => Some(source),
            CatalogStoreError::Parse { source } => Some(source),
        }
    }
}

/// Durable keyed storage for the catalog blob.
///
/// The whole catalog is one value under one fixed key: read wholesale at
/// startup, rewritten wholesale after every refresh.
pub trait CatalogStore {
    fn load(&self) -> Result<Option<String>, CatalogStoreError>;
    fn save(&self, blob: &str) -> Result<(), CatalogStoreError>;
}

/// File-backed store: one JSON file in the project data directory,
/// replaced atomically on every write.
pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    pub fn new() -> Self {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "palaver")
            .expect("Failed to determine data directory");
        Self {
            path: proj_dirs.data_dir().join("tool_catalog.json"),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self) -> Result<Option<String>, CatalogStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|source| CatalogStoreError::Read {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, blob: &str) -> Result<(), CatalogStoreError> {
        let write_error = |source| CatalogStoreError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        if let Some(dir) = &parent {
            fs::create_dir_all(dir).map_err(write_error)?;
        }

        let mut temp_file = match &parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_error)?;

        temp_file.write_all(blob.as_bytes()).map_err(write_error)?;
        temp_file.as_file_mut().sync_all().map_err(write_error)?;
        temp_file
            .persist(&self.path)
            .map_err(|err| write_error(err.error))?;
        Ok(())
    }
}

/// In-memory catalog with whole-blob persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted catalog, or an empty one when nothing was stored
    /// yet.
    pub fn load(store: &dyn CatalogStore) -> Result<Self, CatalogStoreError> {
        match store.load()? {
            Some(blob) => {
                let entries = serde_json::from_str(&blob)
                    .map_err(|source| CatalogStoreError::Parse { source })?;
                Ok(Self { entries })
            }
            None => Ok(Self::new()),
        }
    }

    /// Fold a live tool listing into the catalog. Each live tool fully
    /// overwrites its entry; entries for tools absent from the listing are
    /// left untouched.
    pub fn refresh(&mut self, live: &[ToolDescriptor]) {
        for tool in live {
            self.entries.insert(
                tool.name.clone(),
                CatalogEntry {
                    description: tool.description.clone().unwrap_or_default(),
                    icon: tool.icon.clone(),
                    sub_tools: tool
                        .tools
                        .iter()
                        .map(|sub| SubTool {
                            name: sub.name.clone(),
                            description: sub.description.clone().unwrap_or_default(),
                        })
                        .collect(),
                },
            );
        }
    }

    /// Write the whole catalog through the store as one blob.
    pub fn persist(&self, store: &dyn CatalogStore) -> Result<(), CatalogStoreError> {
        let blob = serde_json::to_string(&self.entries)
            .map_err(|source| CatalogStoreError::Parse { source })?;
        store.save(&blob)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve what to display for one registry entry: the live listing
    /// wins, then the cached entry, then a bare name. Only live servers
    /// can show as enabled; the administrative `disabled` flag always
    /// comes from the registry.
    pub fn display_entry(
        &self,
        registry: &McpRegistry,
        live: &[ToolDescriptor],
        name: &str,
    ) -> DisplayEntry {
        let config = registry.find(name);
        let effectively_enabled = config
            .map(|server| server.is_enabled() && !server.is_disabled())
            .unwrap_or(false);
        let disabled = config.map(|server| server.is_disabled()).unwrap_or(false);

        if let Some(tool) = live
            .iter()
            .find(|tool| tool.name.eq_ignore_ascii_case(name))
        {
            return DisplayEntry {
                name: name.to_string(),
                description: tool.description.clone().unwrap_or_default(),
                icon: tool.icon.clone(),
                enabled: effectively_enabled,
                disabled,
                sub_tools: tool
                    .tools
                    .iter()
                    .map(|sub| SubTool {
                        name: sub.name.clone(),
                        description: sub.description.clone().unwrap_or_default(),
                    })
                    .collect(),
            };
        }

        if let Some(cached) = self.entries.get(name) {
            return DisplayEntry {
                name: name.to_string(),
                description: cached.description.clone(),
                icon: cached.icon.clone(),
                enabled: false,
                disabled,
                sub_tools: cached.sub_tools.clone(),
            };
        }

        DisplayEntry {
            name: name.to_string(),
            description: String::new(),
            icon: None,
            enabled: false,
            disabled,
            sub_tools: Vec::new(),
        }
    }

    /// One display entry per registry entry, in registry order. Discovery
    /// and cache order never influence the result.
    pub fn display_entries(
        &self,
        registry: &McpRegistry,
        live: &[ToolDescriptor],
    ) -> Vec<DisplayEntry> {
        registry
            .servers()
            .iter()
            .map(|server| self.display_entry(registry, live, &server.name))
            .collect()
    }
}

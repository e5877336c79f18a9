//! Configuration for protowiki
//!
//! Loaded from `.protowiki.json` in the protocol directory (or an explicit
//! `--config` path). Every field has a default, so an empty object is a
//! valid configuration.

use crate::core::error::{Result, ResultExt, WikiError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File name looked up inside the protocol directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = ".protowiki.json";

/// How far an enum body extends past its header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumBodyScope {
    /// Up to the first `;` after the header. A `;` nested inside a member's
    /// argument list truncates the body early.
    #[default]
    FirstTerminator,
    /// Up to the first `;` outside parentheses, or the enum's closing brace
    Balanced,
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Name of the packets subdirectory under the protocol root
    pub packets_dir: String,
    /// Extension (without dot) of source units to inspect
    pub source_extension: String,
    /// Category assigned to support types lying directly at the protocol root
    pub root_category: String,
    /// Field names that are never protocol fields (enum backing arrays, wrappers)
    pub ignored_field_names: Vec<String>,
    /// Enum body scoping heuristic
    pub enum_body_scope: EnumBodyScope,
    /// Project name used in page titles
    pub project_name: String,
    /// One-line descriptions shown next to each category on the home page
    pub category_descriptions: BTreeMap<String, String>,
    /// Number of versions listed in the root sidebar
    pub sidebar_version_limit: usize,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            packets_dir: "packets".to_string(),
            source_extension: "java".to_string(),
            root_category: "root".to_string(),
            ignored_field_names: vec!["VALUES".to_string(), "value".to_string()],
            enum_body_scope: EnumBodyScope::FirstTerminator,
            project_name: "Hytale".to_string(),
            category_descriptions: default_category_descriptions(),
            sidebar_version_limit: 10,
        }
    }
}

fn default_category_descriptions() -> BTreeMap<String, String> {
    [
        ("auth", "Authentication and authorization"),
        ("connection", "Connection management (connect, disconnect, ping)"),
        ("entities", "Entity updates and synchronization"),
        ("interaction", "Player-entity interactions"),
        ("inventory", "Inventory management"),
        ("player", "Player state and movement"),
        ("world", "World state and chunk data"),
        ("worldmap", "World map information"),
        ("asseteditor", "Asset editor functionality"),
        ("assets", "Asset management and updates"),
        ("buildertools", "Builder mode tools"),
        ("camera", "Camera control"),
        ("interface_", "UI interface packets"),
        ("machinima", "Machinima/cinematics"),
        ("serveraccess", "Server access control"),
        ("setup", "Initial setup packets"),
        ("window", "Window/GUI management"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl WikiConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .context(format!("reading config {}", path.display()))?;
        let config: WikiConfig = serde_json::from_str(&json)?;
        config.validated()
    }

    /// Load `.protowiki.json` from the protocol directory if present
    pub fn load_or_default(protocol_dir: &Path) -> Result<Self> {
        let candidate = protocol_dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validated(mut self) -> Result<Self> {
        if self.packets_dir.is_empty() || self.packets_dir.contains(['/', '\\']) {
            return Err(WikiError::invalid_config(format!(
                "packets_dir must be a single directory name, got '{}'",
                self.packets_dir
            )));
        }
        self.source_extension = self.source_extension.trim_start_matches('.').to_string();
        if self.source_extension.is_empty() {
            return Err(WikiError::invalid_config("source_extension must not be empty"));
        }
        Ok(self)
    }

    /// Builder pattern: set enum body scope
    pub fn with_enum_body_scope(mut self, scope: EnumBodyScope) -> Self {
        self.enum_body_scope = scope;
        self
    }

    /// Builder pattern: set project name
    pub fn with_project_name(mut self, name: &str) -> Self {
        self.project_name = name.to_string();
        self
    }

    /// Description for a category, empty when unknown
    pub fn category_description(&self, category: &str) -> &str {
        self.category_descriptions
            .get(category)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether a field name is one of the reserved sentinels
    pub fn is_ignored_field(&self, name: &str) -> bool {
        self.ignored_field_names.iter().any(|n| n == name)
    }
}

//! Configuration management for the CP-ABE policy tools
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence)
//! 2. Environment variables (CPABE_* prefix)
//! 3. cpabe.local.toml (gitignored, local overrides)
//! 4. cpabe.toml (git-tracked, project config)
//! 5. ~/.config/cpabe/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use cpabe_policy::{AttributeCatalog, SpacePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpabeConfig {
    pub project: ProjectConfig,
    pub normalizer: NormalizerConfig,
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "cpabe-project".to_string(),
        }
    }
}

/// How typed attribute entries are normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub space_policy: SpacePolicy,
}

/// Selectable attributes. An empty list means the built-in catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub attributes: Vec<String>,
}

/// Where stored policy records are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub policies_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            policies_file: PathBuf::from(".cpabe/policies.json"),
        }
    }
}

impl CpabeConfig {
    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Builds the attribute catalog, falling back to the built-in one.
    pub fn catalog(&self) -> Result<AttributeCatalog, ConfigError> {
        if self.catalog.attributes.is_empty() {
            return Ok(AttributeCatalog::default());
        }
        Ok(AttributeCatalog::from_entries(&self.catalog.attributes)?)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.store.policies_file.is_relative() {
            self.store.policies_file = base.join(&self.store.policies_file);
        }
    }
}

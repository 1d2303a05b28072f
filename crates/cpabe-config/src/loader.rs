//! Configuration loader with multi-source merging

use crate::{CpabeConfig, Paths};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    user_config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "CPABE".to_string(),
            user_config_file: Paths::new().user_config_file().ok(),
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "CPABE")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Use `path` instead of the XDG user file (~/.config/cpabe/config.toml)
    pub fn with_user_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.user_config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Config files that exist, lowest precedence first: user, project, local.
    pub fn layers(&self) -> Vec<PathBuf> {
        self.user_config_file
            .iter()
            .cloned()
            .chain([
                Paths::project_config_file(&self.project_dir),
                Paths::local_config_file(&self.project_dir),
            ])
            .filter(|path| path.is_file())
            .collect()
    }

    /// Load configuration from all sources with proper precedence
    ///
    /// Built-in defaults, then each of [`Self::layers`], then `CPABE_*`
    /// variables. Relative store paths resolve against the project directory.
    pub fn load(self) -> Result<CpabeConfig> {
        let defaults = CpabeConfig::default();
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&defaults)?);

        for layer in self.layers() {
            debug!(file = %layer.display(), "applying config layer");
            builder = builder.add_source(
                config::File::from(layer)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CPABE_SECTION__KEY: keys such as space_policy contain "_", so
        // sections are split on a double underscore.
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("catalog.attributes")
                .try_parsing(true),
        );

        let mut cpabe_config: CpabeConfig = builder
            .build()
            .and_then(config::Config::try_deserialize)
            .context("Failed to load configuration")?;

        cpabe_config.resolve_paths(&self.project_dir);
        debug!(
            space_policy = ?cpabe_config.normalizer.space_policy,
            catalog_entries = cpabe_config.catalog.attributes.len(),
            "configuration loaded"
        );

        Ok(cpabe_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

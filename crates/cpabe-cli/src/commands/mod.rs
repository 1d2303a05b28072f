//! CLI command implementations.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use cpabe_config::CpabeConfig;
use cpabe_policy::{PolicyExpression, SpacePolicy};
use tracing::debug;

pub mod attributes;
pub mod catalog;
pub mod config;
pub mod policy;
pub mod request;

/// Loads the project configuration, applying command-line overrides.
pub fn load_config(project: &Path, underscore_spaces: bool) -> Result<CpabeConfig> {
    let mut config =
        CpabeConfig::load_from_dir(project).context("Failed to load configuration")?;
    if underscore_spaces {
        config.normalizer.space_policy = SpacePolicy::UnderscoreFallback;
    }
    debug!(
        project = %project.display(),
        space_policy = ?config.normalizer.space_policy,
        "configuration loaded"
    );
    Ok(config)
}

/// Reads a file, or stdin when `input` is "-".
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
}

/// Reads a JSON policy model.
fn read_model(input: &str) -> Result<PolicyExpression> {
    let json = read_input(input)?;
    serde_json::from_str(&json).with_context(|| format!("Invalid policy model in {input}"))
}

//! Configuration error types

use cpabe_policy::FormatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid catalog entry: {0}")]
    CatalogError(#[from] FormatError),

    #[error("Failed to render configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("XDG directory error: {0}")]
    XdgError(String),
}

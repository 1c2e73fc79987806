//! Configuration loading and types for blogport.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Layered loading from defaults, a YAML file and the environment (`load`)

mod load;
mod types;

use std::path::PathBuf;

// Re-export all types for convenient access
pub use load::config_path_in;
pub use types::{BatchConfig, Config, PathsConfig, SiteConfig};

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "blogport.yaml";

/// Prefix for environment overrides, e.g. `BLOGPORT__BATCH__MODEL`.
pub const ENV_PREFIX: &str = "BLOGPORT";

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("config file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("config path is not valid UTF-8: {0}")]
    EncodePath(PathBuf),
}

//! Configuration loading from files and the environment.
//!
//! Sources are layered lowest to highest: struct defaults, the YAML file
//! (when present), then `BLOGPORT__SECTION__KEY` environment variables.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::util::base_path_from_config;

use super::{Config, ConfigError, DEFAULT_CONFIG_FILE, ENV_PREFIX};

impl Config {
    /// Load the config from the command line argument, defaulting to `blogport.yaml`.
    ///
    /// An explicitly named file must exist. The default file is optional, so a
    /// bare export directory works with no config at all. Paths inside the
    /// config are resolved against the config file's directory.
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = config_file.is_some();
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        if explicit && !config_file.exists() {
            return Err(ConfigError::NotFound(config_file));
        }

        let mut config = Self::load_from_file(&config_file)?;
        let base_path = base_path_from_config(&config_file);
        config.paths = config.paths.resolve(&base_path);
        Ok(config)
    }

    /// Load the config from a file path, layering environment overrides on top.
    ///
    /// Paths are returned as written; callers resolve them.
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        debug!(path = %path.display(), exists = path.exists(), "loading config");

        Ok(::config::Config::builder()
            .add_source(
                ::config::File::new(path_str, ::config::FileFormat::Yaml).required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Config>()?)
    }

    /// Render this config as YAML, for `init`.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Where `init` writes a config for a given project directory.
pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_FILE)
}

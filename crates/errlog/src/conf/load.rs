//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::model::{SnippetConfig, ViewerConfig};
use crate::error::{Result, ViewerError};
use crate::logs::sort::SortKey;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/errlog/errlog.toml";

impl ViewerConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// A file named by `$ERRLOG_CONFIG_FILE` must exist; the default
    /// location is optional.
    pub fn load() -> Result<Self> {
        match std::env::var("ERRLOG_CONFIG_FILE") {
            Ok(config_path) => Self::load_from(Path::new(&config_path)),
            Err(_) => Self::load_with(Path::new(DEFAULT_CONFIG_PATH), false),
        }
    }

    /// Same as [`ViewerConfig::load`] with an explicit config file path,
    /// which must exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        Self::load_with(config_path, true)
    }

    fn load_with(config_path: &Path, required: bool) -> Result<Self> {
        let mut config = if config_path.exists() {
            tracing::info!("Loading configuration from: {}", config_path.display());
            Self::from_file(config_path)?
        } else if required {
            return Err(ViewerError::Config(format!(
                "config file {} does not exist",
                config_path.display()
            )));
        } else {
            tracing::debug!(
                "Config file not found at {}, using environment variables",
                config_path.display()
            );
            Self::from_env()?
        };

        // Environment variables override file config for critical settings
        if let Ok(log) = std::env::var("ERRLOG_LOG_PATH") {
            config.log_path = Some(PathBuf::from(log));
        }
        if let Ok(cache) = std::env::var("ERRLOG_CACHE_PATH") {
            config.cache_path = Some(PathBuf::from(cache));
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        toml::from_str(&contents)
            .map_err(|e| ViewerError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        let sort = match std::env::var("ERRLOG_SORT") {
            Ok(list) => SortKey::parse_list(&list)?,
            Err(_) => SortKey::default_order(),
        };
        let output = match std::env::var("ERRLOG_FORMAT") {
            Ok(format) => format.parse().map_err(ViewerError::Config)?,
            Err(_) => Default::default(),
        };

        Ok(Self {
            log_path: std::env::var("ERRLOG_LOG_PATH").ok().map(PathBuf::from),
            cache_path: std::env::var("ERRLOG_CACHE_PATH").ok().map(PathBuf::from),
            sort,
            output,
            snippet: SnippetConfig::from_env(),
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sort.is_empty() {
            return Err(ViewerError::Config("sort must name at least one field".to_string()));
        }
        if let (Some(log), Some(cache)) = (&self.log_path, &self.cache_path) {
            if log == cache {
                return Err(ViewerError::Config(
                    "cache_path must differ from log_path".to_string(),
                ));
            }
        }
        self.snippet.validate().map_err(ViewerError::Config)?;
        Ok(())
    }
}

impl SnippetConfig {
    /// Load snippet configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("ERRLOG_SNIPPET_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.enabled),
            lines_before: std::env::var("ERRLOG_SNIPPET_BEFORE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.lines_before),
            lines_after: std::env::var("ERRLOG_SNIPPET_AFTER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.lines_after),
            virtual_prefixes: defaults.virtual_prefixes,
        }
    }
}

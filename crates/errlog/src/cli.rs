//! Command-line flags and how they override the loaded configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::conf::{OutputFormat, ViewerConfig};
use crate::error::Result;
use crate::filter::EntryFilter;
use crate::logs::sort::SortKey;

#[derive(Parser, Debug)]
#[command(
    name = "errlog",
    version,
    about = "Aggregate a PHP error log into distinct errors, incrementally"
)]
pub struct Cli {
    /// PHP error log to read (overrides config and ERRLOG_LOG_PATH)
    pub log: Option<PathBuf>,

    /// Cache snapshot used to resume from the last scanned offset
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Ignore any configured cache and scan the whole log
    #[arg(long, conflicts_with = "cache")]
    pub no_cache: bool,

    /// Configuration file (default: $ERRLOG_CONFIG_FILE or /etc/errlog/errlog.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Sort keys, e.g. `hits:desc,type` or `location.line:asc`
    #[arg(long, value_name = "FIELD[:asc|desc],...")]
    pub sort: Option<String>,

    /// Only show entries of this type token (repeatable)
    #[arg(long = "type", value_name = "TOKEN")]
    pub types: Vec<String>,

    /// Only show entries whose path (or message) matches this regex
    #[arg(long, value_name = "REGEX")]
    pub path: Option<String>,

    /// Output format
    #[arg(long, value_name = "text|json")]
    pub format: Option<OutputFormat>,
}

impl Cli {
    /// Apply flag overrides on top of file/env configuration.
    pub fn apply(&self, config: &mut ViewerConfig) -> Result<()> {
        if let Some(log) = &self.log {
            config.log_path = Some(log.clone());
        }
        if self.no_cache {
            config.cache_path = None;
        } else if let Some(cache) = &self.cache {
            config.cache_path = Some(cache.clone());
        }
        if let Some(sort) = &self.sort {
            config.sort = SortKey::parse_list(sort)?;
        }
        if let Some(format) = self.format {
            config.output = format;
        }
        Ok(())
    }

    pub fn entry_filter(&self) -> Result<EntryFilter> {
        let filter = EntryFilter::new().with_types(&self.types);
        Ok(match &self.path {
            Some(pattern) => filter.with_path(pattern)?,
            None => filter,
        })
    }
}

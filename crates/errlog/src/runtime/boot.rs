//! Boot — logging init and config load.

use std::path::Path;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::ViewerConfig;
use crate::error::Result;

/// Initialise the tracing / logging subsystem.
///
/// Diagnostics go to stderr; stdout carries only the report.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "errlog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load configuration from `config_path` when given, otherwise from
/// `$ERRLOG_CONFIG_FILE` or the default location, with environment
/// overrides applied.
pub fn load_config(config_path: Option<&Path>) -> Result<ViewerConfig> {
    let config = match config_path {
        Some(path) => ViewerConfig::load_from(path)?,
        None => ViewerConfig::load()?,
    };

    info!(
        "Loaded configuration: log_path={}, cache_path={}",
        config
            .log_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unset>".to_string()),
        config
            .cache_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string()),
    );
    info!(
        "Snippets: enabled={}, window=-{}/+{}",
        config.snippet.enabled, config.snippet.lines_before, config.snippet.lines_after
    );

    Ok(config)
}

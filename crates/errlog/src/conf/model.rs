//! Model — ViewerConfig and related structs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logs::sort::SortKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// PHP error log to read; required at run time
    pub log_path: Option<PathBuf>,
    /// Incremental cache snapshot; no cache when unset
    pub cache_path: Option<PathBuf>,
    pub sort: Vec<SortKey>,
    pub output: OutputFormat,
    pub snippet: SnippetConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    pub enabled: bool,
    pub lines_before: u64,
    pub lines_after: u64,
    /// Scheme-like prefixes stripped before the source file is opened
    pub virtual_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            cache_path: None,
            sort: SortKey::default_order(),
            output: OutputFormat::Text,
            snippet: SnippetConfig::default(),
        }
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lines_before: 3,
            lines_after: 3,
            virtual_prefixes: vec!["zend.view://".to_string()],
        }
    }
}

impl SnippetConfig {
    /// Validate snippet window values
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.lines_before == 0 && self.lines_after == 0 {
            return Err(
                "snippet.lines_before and snippet.lines_after cannot both be 0 when snippets are enabled"
                    .to_string(),
            );
        }
        if self.virtual_prefixes.iter().any(|p| p.is_empty()) {
            return Err("snippet.virtual_prefixes must not contain empty prefixes".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ViewerConfig Defaults ────────────────────────────────────

    #[test]
    fn test_viewer_config_defaults() {
        let cfg = ViewerConfig::default();
        assert!(cfg.log_path.is_none());
        assert!(cfg.cache_path.is_none(), "No cache unless configured");
        assert_eq!(cfg.sort, vec![SortKey::desc("last")]);
        assert_eq!(cfg.output, OutputFormat::Text);
    }

    #[test]
    fn test_snippet_config_defaults() {
        let snippet = SnippetConfig::default();
        assert!(snippet.enabled);
        assert_eq!(snippet.lines_before, 3);
        assert_eq!(snippet.lines_after, 3);
        assert_eq!(snippet.virtual_prefixes, vec!["zend.view://".to_string()]);
    }

    // ── SnippetConfig Validation ─────────────────────────────────

    #[test]
    fn test_snippet_validate_default_passes() {
        assert!(SnippetConfig::default().validate().is_ok());
    }

    #[test]
    fn test_snippet_validate_rejects_empty_window() {
        let snippet = SnippetConfig {
            lines_before: 0,
            lines_after: 0,
            ..Default::default()
        };
        let err = snippet.validate().unwrap_err();
        assert!(err.contains("lines_before"), "Error should mention window: {}", err);
    }

    #[test]
    fn test_snippet_validate_disabled_allows_empty_window() {
        let snippet = SnippetConfig {
            enabled: false,
            lines_before: 0,
            lines_after: 0,
            ..Default::default()
        };
        assert!(snippet.validate().is_ok());
    }

    #[test]
    fn test_snippet_validate_rejects_empty_prefix() {
        let snippet = SnippetConfig {
            virtual_prefixes: vec![String::new()],
            ..Default::default()
        };
        assert!(snippet.validate().is_err());
    }

    // ── Serialization ────────────────────────────────────────────

    #[test]
    fn test_viewer_config_toml_round_trip() {
        let cfg = ViewerConfig {
            log_path: Some(PathBuf::from("/var/log/php/error.log")),
            cache_path: Some(PathBuf::from("/tmp/errlog.cache")),
            sort: vec![SortKey::desc("hits"), SortKey::asc("type")],
            ..Default::default()
        };
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let back: ViewerConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_viewer_config_deserialize_partial_toml() {
        let toml_str = r#"
            log_path = "/var/log/php_errors.log"
            sort = ["hits:desc", "location.line"]
            output = "json"

            [snippet]
            lines_after = 5
        "#;
        let cfg: ViewerConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.log_path, Some(PathBuf::from("/var/log/php_errors.log")));
        assert_eq!(cfg.sort, vec![SortKey::desc("hits"), SortKey::asc("location.line")]);
        assert_eq!(cfg.output, OutputFormat::Json);
        assert_eq!(cfg.snippet.lines_after, 5);
        assert_eq!(cfg.snippet.lines_before, 3); // default
    }

    #[test]
    fn test_bad_sort_key_rejected_by_toml() {
        let toml_str = r#"sort = ["hits:upwards"]"#;
        assert!(toml::from_str::<ViewerConfig>(toml_str).is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}

//! Report — what the core hands to the display layer.
//!
//! The sorted, filtered entries plus the type maps. Per-type counts are
//! always the totals of the aggregate, independent of any filter.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::DateTime;
use serde::Serialize;

use crate::conf::OutputFormat;
use crate::error::Result;
use crate::logs::aggregate::LogEntry;
use crate::logs::types::TypeRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub source: PathBuf,
    pub entries: Vec<LogEntry>,
    /// Raw label → normalized token, ordered by label
    pub types: BTreeMap<String, String>,
    /// Raw label → number of distinct entries
    pub counts: BTreeMap<String, u64>,
    pub total: usize,
    pub shown: usize,
    /// Set when the cache could not be restored or written this run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_warning: Option<String>,
}

impl Report {
    pub fn new(
        source: impl Into<PathBuf>,
        entries: Vec<LogEntry>,
        types: &TypeRegistry,
        total: usize,
    ) -> Self {
        Self {
            source: source.into(),
            shown: entries.len(),
            entries,
            types: types.tokens().clone(),
            counts: types.counts().clone(),
            total,
            cache_warning: None,
        }
    }

    pub fn with_cache_warning(mut self, warning: Option<String>) -> Self {
        self.cache_warning = warning;
        self
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: showing {} of {} distinct errors",
            self.source.display(),
            self.shown,
            self.total
        )?;

        let summary: Vec<String> = self
            .counts
            .iter()
            .map(|(label, count)| format!("{} ({})", label, count))
            .collect();
        if !summary.is_empty() {
            writeln!(f, "types: {}", summary.join(", "))?;
        }
        if let Some(warning) = &self.cache_warning {
            writeln!(f, "cache: {}", warning)?;
        }

        for entry in &self.entries {
            writeln!(f)?;
            write_entry(f, entry)?;
        }
        Ok(())
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, entry: &LogEntry) -> fmt::Result {
    writeln!(f, "[{}] {}", entry.kind, entry.display_message())?;
    if let Some(extra) = &entry.extra {
        writeln!(f, "{}", extra)?;
    }
    if let (Some(path), Some(line)) = (entry.path(), entry.line()) {
        writeln!(f, "{}, line {}", path, line)?;
    }
    writeln!(
        f,
        "last seen {}, {} {}",
        format_seen(entry.last),
        entry.hits,
        if entry.hits == 1 { "hit" } else { "hits" }
    )?;

    if let Some(trace) = &entry.trace {
        writeln!(f, "  stack trace:")?;
        write_block(f, trace)?;
    }
    if let Some(snippet) = entry.location.as_ref().map(|l| &l.snippet).filter(|s| !s.is_empty()) {
        writeln!(f, "  code:")?;
        write_block(f, snippet)?;
    }
    Ok(())
}

fn write_block(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for line in text.lines() {
        writeln!(f, "    {}", line)?;
    }
    Ok(())
}

/// `2026-10-16 3:04pm`, in UTC.
fn format_seen(epoch: i64) -> String {
    match DateTime::from_timestamp(epoch, 0) {
        Some(time) => time.format("%Y-%m-%d %-I:%M%P").to_string(),
        None => epoch.to_string(),
    }
}

//! Select — which aggregated entries to show.
//!
//! Selection never touches the aggregate; it picks from an already sorted
//! list and preserves its order.

use std::collections::BTreeSet;

use crate::filter::engine::{FilterEngine, FilterError};
use crate::logs::aggregate::LogEntry;
use crate::logs::types::normalize;

/// Entry selection by type token and path text.
///
/// An empty filter selects everything.
#[derive(Default)]
pub struct EntryFilter {
    /// Allowed normalized type tokens; `None` allows every type
    types: Option<BTreeSet<String>>,
    /// Matched against the entry's path, or its message when it has none
    path: Option<FilterEngine>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given type tokens. Tokens are normalized, so
    /// `"Fatal Error"` and `fatalerror` are equivalent.
    pub fn with_types<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: BTreeSet<String> = tokens.into_iter().map(|t| normalize(t.as_ref())).collect();
        self.types = if tokens.is_empty() { None } else { Some(tokens) };
        self
    }

    /// Keep entries whose path matches `pattern` (case-insensitive).
    pub fn with_path(mut self, pattern: &str) -> Result<Self, FilterError> {
        self.path = Some(FilterEngine::new(pattern, false)?);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_none() && self.path.is_none()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(types) = &self.types {
            if !types.contains(&normalize(&entry.kind)) {
                return false;
            }
        }

        if let Some(path) = &self.path {
            let text = entry.path().unwrap_or(entry.message.as_str());
            if !path.is_match(text.as_bytes()) {
                return false;
            }
        }

        true
    }

    /// Keep the matching entries, in order.
    pub fn select(&self, entries: Vec<LogEntry>) -> Vec<LogEntry> {
        if self.is_empty() {
            return entries;
        }
        let total = entries.len();
        let selected: Vec<LogEntry> = entries.into_iter().filter(|e| self.matches(e)).collect();
        tracing::debug!(total, shown = selected.len(), "filter: entries selected");
        if let Some(path) = &self.path {
            let (checked, matched, bytes) = path.stats();
            tracing::debug!(checked, matched, bytes, "filter: path pattern stats");
        }
        selected
    }
}

//! Type labels: display tokens and per-label entry counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Collapse a raw label into a styling/filtering token: lower-case ASCII
/// letters only. Distinct labels may share a token.
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Label → token and label → number of distinct entries.
///
/// Both maps are ordered by label so the display layer lists types
/// alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistry {
    tokens: BTreeMap<String, String>,
    counts: BTreeMap<String, u64>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(tokens: BTreeMap<String, String>, counts: BTreeMap<String, u64>) -> Self {
        Self { tokens, counts }
    }

    /// Record one newly created entry carrying `label`.
    pub fn register_entry(&mut self, label: &str) {
        self.tokens
            .entry(label.to_string())
            .or_insert_with(|| normalize(label));
        *self.counts.entry(label.to_string()).or_insert(0) += 1;
    }

    pub fn token(&self, label: &str) -> Option<&str> {
        self.tokens.get(label).map(String::as_str)
    }

    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn tokens(&self) -> &BTreeMap<String, String> {
        &self.tokens
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn into_parts(self) -> (BTreeMap<String, String>, BTreeMap<String, u64>) {
        (self.tokens, self.counts)
    }
}

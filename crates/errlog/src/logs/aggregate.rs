//! Dedup of repeated records into aggregated entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::capture::Attachment;
use super::location::{LocationExtractor, SourceLocation};
use super::types::TypeRegistry;
use crate::parser::HeaderLine;

/// One distinct message and everything observed about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Raw type label, lower-cased (`"fatal error"`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Earliest occurrence, epoch seconds
    pub first: i64,
    /// Latest occurrence, epoch seconds
    pub last: i64,
    /// Trimmed message text; the dedup key
    pub message: String,
    pub hits: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl LogEntry {
    fn new(header: &HeaderLine, location: Option<SourceLocation>) -> Self {
        Self {
            kind: header.label.clone(),
            first: header.timestamp,
            last: header.timestamp,
            message: header.message.clone(),
            hits: 1,
            trace: None,
            extra: None,
            location,
        }
    }

    /// Message without its location clause, when one was found.
    pub fn display_message(&self) -> &str {
        self.location
            .as_ref()
            .map(|l| l.core.as_str())
            .unwrap_or(self.message.as_str())
    }

    pub fn path(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.path.as_str())
    }

    pub fn line(&self) -> Option<u64> {
        self.location.as_ref().map(|l| l.line)
    }

    fn record_hit(&mut self, timestamp: i64) {
        self.hits += 1;
        self.first = self.first.min(timestamp);
        self.last = self.last.max(timestamp);
    }
}

/// Position of an entry in insertion order. Stable for the lifetime of
/// the aggregate, including across cache round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Created(EntryId),
    Repeated(EntryId),
}

impl Observation {
    pub fn id(&self) -> EntryId {
        match self {
            Observation::Created(id) | Observation::Repeated(id) => *id,
        }
    }
}

/// Owns every entry, the message index and the type registry.
pub struct Aggregator {
    entries: Vec<LogEntry>,
    index: HashMap<String, EntryId>,
    types: TypeRegistry,
    locator: LocationExtractor,
}

impl Aggregator {
    pub fn new(locator: LocationExtractor) -> Self {
        Self::restore(Vec::new(), TypeRegistry::new(), locator)
    }

    /// Rebuild from previously aggregated state.
    pub fn restore(entries: Vec<LogEntry>, types: TypeRegistry, locator: LocationExtractor) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if index.insert(entry.message.clone(), EntryId(pos)).is_some() {
                tracing::warn!(message = %entry.message, "aggregate: duplicate entry in restored state");
            }
        }

        Self {
            entries,
            index,
            types,
            locator,
        }
    }

    /// Merge one header occurrence.
    ///
    /// New messages get location/snippet extraction and a type count;
    /// repeats only move `hits`, `first` and `last`.
    pub fn observe(&mut self, header: &HeaderLine) -> Observation {
        if let Some(&id) = self.index.get(&header.message) {
            self.entries[id.0].record_hit(header.timestamp);
            return Observation::Repeated(id);
        }

        let location = self.locator.extract(&header.message);
        let id = EntryId(self.entries.len());
        self.entries.push(LogEntry::new(header, location));
        self.index.insert(header.message.clone(), id);
        self.types.register_entry(&header.label);

        tracing::trace!(id = id.0, kind = %header.label, "aggregate: new entry");
        Observation::Created(id)
    }

    /// Apply captured continuation text, replacing any earlier capture of
    /// the same kind.
    pub fn attach(&mut self, id: EntryId, attachment: Attachment) {
        let Some(entry) = self.entries.get_mut(id.0) else {
            tracing::warn!(id = id.0, "aggregate: attachment for unknown entry dropped");
            return;
        };
        match attachment {
            Attachment::Trace(text) => entry.trace = Some(text),
            Attachment::Extra(text) => entry.extra = Some(text),
        }
    }

    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        self.entries.get(id.0)
    }

    pub fn lookup(&self, message: &str) -> Option<&LogEntry> {
        self.index.get(message).and_then(|id| self.get(*id))
    }

    pub fn contains(&self, id: EntryId) -> bool {
        id.0 < self.entries.len()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_parts(self) -> (Vec<LogEntry>, TypeRegistry) {
        (self.entries, self.types)
    }
}

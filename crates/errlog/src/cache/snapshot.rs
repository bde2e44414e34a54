//! Snapshot — the persisted aggregate plus the byte offset it covers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logs::aggregate::{Aggregator, EntryId, LogEntry};
use crate::logs::capture::CaptureState;
use crate::logs::location::LocationExtractor;
use crate::logs::scan::ScanState;
use crate::logs::types::TypeRegistry;

/// Bumped whenever the on-disk layout changes; older snapshots are
/// discarded instead of being misread.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub version: u32,
    /// Log file the snapshot was built from
    pub source: PathBuf,
    /// Bytes of `source` already folded into `entries`
    pub offset: u64,
    /// Entries in insertion order; `active` indexes into this list
    pub entries: Vec<LogEntry>,
    pub types: BTreeMap<String, String>,
    pub counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub active: Option<EntryId>,
    #[serde(default)]
    pub capture: CaptureState,
}

impl CacheSnapshot {
    pub fn empty(source: impl Into<PathBuf>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            source: source.into(),
            offset: 0,
            entries: Vec::new(),
            types: BTreeMap::new(),
            counts: BTreeMap::new(),
            active: None,
            capture: CaptureState::default(),
        }
    }

    /// Capture the state after scanning `source` up to `offset`.
    pub fn capture(
        source: impl Into<PathBuf>,
        offset: u64,
        aggregator: &Aggregator,
        state: &ScanState,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            source: source.into(),
            offset,
            entries: aggregator.entries().to_vec(),
            types: aggregator.types().tokens().clone(),
            counts: aggregator.types().counts().clone(),
            active: state.active,
            capture: state.capture.clone(),
        }
    }

    /// Reasons this snapshot cannot be resumed against `source` of
    /// `log_len` bytes.
    pub fn check(&self, source: &Path, log_len: u64) -> Result<(), String> {
        if self.version != SNAPSHOT_VERSION {
            return Err(format!(
                "snapshot version {} does not match {}",
                self.version, SNAPSHOT_VERSION
            ));
        }
        if self.source != source {
            return Err(format!(
                "snapshot was built from '{}', not '{}'",
                self.source.display(),
                source.display()
            ));
        }
        if self.offset > log_len {
            return Err(format!(
                "snapshot offset {} is past the end of the log ({} bytes)",
                self.offset, log_len
            ));
        }
        if let Some(active) = self.active {
            if active.0 >= self.entries.len() {
                return Err(format!("active entry {} out of range", active.0));
            }
        }
        Ok(())
    }

    /// Split into an aggregator, the offset and the in-flight scan state.
    pub fn into_aggregator(self, locator: LocationExtractor) -> (Aggregator, u64, ScanState) {
        let types = TypeRegistry::from_parts(self.types, self.counts);
        let aggregator = Aggregator::restore(self.entries, types, locator);
        let state = ScanState {
            active: self.active,
            capture: self.capture,
        };
        (aggregator, self.offset, state)
    }
}

//! Store — reading and atomically replacing the snapshot file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::snapshot::CacheSnapshot;
use crate::error::CacheError;

/// How a run started relative to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No snapshot yet; full scan from offset 0
    Fresh,
    /// Snapshot accepted; scan continues at `offset`
    Resumed { offset: u64 },
    /// Snapshot unusable; full scan from offset 0
    Discarded { reason: String },
}

pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, `None` when no cache file exists yet.
    pub fn load(&self) -> Result<Option<CacheSnapshot>, CacheError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(&self.path, e)),
        };
        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(snapshot))
    }

    /// Snapshot to resume `source` (currently `log_len` bytes) from.
    ///
    /// Never fails: anything unusable is logged and replaced by an empty
    /// snapshot so the caller rescans from the start.
    pub fn restore(&self, source: &Path, log_len: u64) -> (CacheSnapshot, RestoreOutcome) {
        let reason = match self.load() {
            Ok(None) => {
                tracing::info!(cache = %self.path.display(), "cache: no snapshot, full scan");
                return (CacheSnapshot::empty(source), RestoreOutcome::Fresh);
            }
            Ok(Some(snapshot)) => match snapshot.check(source, log_len) {
                Ok(()) => {
                    let offset = snapshot.offset;
                    tracing::info!(
                        cache = %self.path.display(),
                        offset,
                        entries = snapshot.entries.len(),
                        "cache: snapshot restored"
                    );
                    return (snapshot, RestoreOutcome::Resumed { offset });
                }
                Err(reason) => reason,
            },
            Err(e) => e.to_string(),
        };

        tracing::warn!(cache = %self.path.display(), %reason, "cache: discarding snapshot, full rescan");
        (CacheSnapshot::empty(source), RestoreOutcome::Discarded { reason })
    }

    /// Replace the snapshot file.
    ///
    /// Written to a temporary file in the same directory, synced, then
    /// renamed over the old snapshot; a crash leaves the previous one intact.
    pub fn persist(&self, snapshot: &CacheSnapshot) -> Result<(), CacheError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| CacheError::io(dir, e))?;
        {
            let writer = BufWriter::new(temp.as_file_mut());
            write_snapshot(writer, snapshot, &self.path)?;
        }
        temp.as_file_mut()
            .sync_all()
            .map_err(|e| CacheError::io(&self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| CacheError::io(&self.path, e.error))?;

        tracing::debug!(
            cache = %self.path.display(),
            offset = snapshot.offset,
            entries = snapshot.entries.len(),
            "cache: snapshot persisted"
        );
        Ok(())
    }
}

/// Serialize `snapshot` into `writer` and flush it. Write failures are
/// reported as I/O errors on `path`, not as corruption.
fn write_snapshot<W: Write>(
    mut writer: W,
    snapshot: &CacheSnapshot,
    path: &Path,
) -> Result<(), CacheError> {
    serde_json::to_writer(&mut writer, snapshot).map_err(|e| {
        if e.is_io() {
            CacheError::io(path, e.into())
        } else {
            CacheError::Corrupt(e)
        }
    })?;
    writer.flush().map_err(|e| CacheError::io(path, e))
}

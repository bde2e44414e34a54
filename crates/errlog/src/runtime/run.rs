//! Run — one invocation: restore, scan, persist, sort, select.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use tracing::{error, info, warn};

use crate::cache::{CacheLock, CacheSnapshot, CacheStore, RestoreOutcome};
use crate::conf::{SnippetConfig, ViewerConfig};
use crate::error::{Result, ViewerError};
use crate::filter::EntryFilter;
use crate::logs::aggregate::Aggregator;
use crate::logs::location::LocationExtractor;
use crate::logs::scan::{ScanStats, Scanner};
use crate::logs::sort::sort_records;
use crate::report::Report;

/// Aggregate state after bringing the cache up to date with the log.
pub struct ScanOutcome {
    pub aggregator: Aggregator,
    /// Byte offset the aggregate now covers
    pub offset: u64,
    /// `None` when running without a cache
    pub restore: Option<RestoreOutcome>,
    pub stats: ScanStats,
    /// Why the cache was not used or not updated, if it wasn't
    pub cache_warning: Option<String>,
}

/// Bring `cache_path` (if any) up to date with `log_path` and return the
/// resulting aggregate.
///
/// Only failures on the log itself are errors; every cache problem is
/// logged and reported through [`ScanOutcome::cache_warning`].
pub fn scan_log(
    log_path: &Path,
    cache_path: Option<&Path>,
    snippet: &SnippetConfig,
) -> Result<ScanOutcome> {
    let mut log = File::open(log_path).map_err(|source| ViewerError::LogUnreadable {
        path: log_path.to_path_buf(),
        source,
    })?;
    let log_len = log
        .metadata()
        .map_err(|source| ViewerError::LogUnreadable {
            path: log_path.to_path_buf(),
            source,
        })?
        .len();
    // The cache is keyed by file, not by how the path was spelled
    let source = std::fs::canonicalize(log_path).unwrap_or_else(|_| log_path.to_path_buf());

    let mut cache_warning = None;

    let cache = match cache_path {
        Some(path) => match CacheLock::acquire(path) {
            Ok(lock) => Some((lock, CacheStore::new(path))),
            Err(e) => {
                warn!(error = %e, "cache: unavailable, scanning without it");
                cache_warning = Some(e.to_string());
                None
            }
        },
        None => None,
    };

    let (snapshot, restore) = match &cache {
        Some((_, store)) => {
            let (snapshot, outcome) = store.restore(&source, log_len);
            if let RestoreOutcome::Discarded { reason } = &outcome {
                cache_warning = Some(format!("cache discarded: {}", reason));
            }
            (snapshot, Some(outcome))
        }
        None => (CacheSnapshot::empty(&source), None),
    };

    let (aggregator, start, state) = snapshot.into_aggregator(LocationExtractor::new(snippet));
    let mut scanner = Scanner::resume(aggregator, state);

    log.seek(SeekFrom::Start(start))?;
    let consumed = scanner.scan(BufReader::new(log))?;
    let offset = start + consumed;

    let (aggregator, state, stats) = scanner.finish();
    info!(
        start,
        offset,
        bytes = stats.bytes,
        lines = stats.lines,
        headers = stats.headers,
        new_entries = stats.new_entries,
        repeat_hits = stats.repeat_hits,
        continuation_lines = stats.continuation_lines,
        orphan_lines = stats.orphan_lines,
        entries = aggregator.len(),
        "scan complete"
    );

    if let Some((lock, store)) = cache {
        let snapshot = CacheSnapshot::capture(&source, offset, &aggregator, &state);
        if let Err(e) = store.persist(&snapshot) {
            error!(cache = %store.path().display(), error = %e, "cache: failed to write snapshot");
            cache_warning = Some(format!("cache not updated: {}", e));
        }
        drop(lock);
    }

    Ok(ScanOutcome {
        aggregator,
        offset,
        restore,
        stats,
        cache_warning,
    })
}

/// Full pipeline for one invocation.
pub fn run(config: &ViewerConfig, filter: &EntryFilter) -> Result<Report> {
    let log_path = config.log_path.as_deref().ok_or(ViewerError::MissingLogPath)?;

    let outcome = scan_log(log_path, config.cache_path.as_deref(), &config.snippet)?;
    let total = outcome.aggregator.len();
    let (entries, types) = outcome.aggregator.into_parts();

    let sorted = sort_records(entries, &config.sort);
    let selected = filter.select(sorted);

    Ok(Report::new(log_path, selected, &types, total).with_cache_warning(outcome.cache_warning))
}

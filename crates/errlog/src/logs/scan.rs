//! Sequential scan: classifier → capturer → aggregator, one line at a time.
//!
//! The active entry (the one continuation lines attach to) is threaded
//! explicitly through [`Scanner::step`] and persisted in [`ScanState`] so a
//! later invocation resumes mid-record exactly where this one stopped.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use super::aggregate::{Aggregator, EntryId, Observation};
use super::capture::{Attachment, CaptureState, TraceCapturer};
use super::pattern::trace_frame;
use crate::parser::LineClassifier;

/// In-flight scanner state carried between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    /// Entry opened by the most recent header line
    pub active: Option<EntryId>,
    pub capture: CaptureState,
}

/// Per-scan counters, logged once the scan completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub bytes: u64,
    pub lines: u64,
    pub headers: u64,
    pub new_entries: u64,
    pub repeat_hits: u64,
    pub continuation_lines: u64,
    /// Continuation lines seen before any entry existed; dropped
    pub orphan_lines: u64,
}

pub struct Scanner {
    classifier: LineClassifier,
    aggregator: Aggregator,
    capturer: TraceCapturer,
    active: Option<EntryId>,
    stats: ScanStats,
}

impl Scanner {
    pub fn new(aggregator: Aggregator) -> Self {
        Self::resume(aggregator, ScanState::default())
    }

    /// Continue from a persisted state. An active id that does not exist
    /// in `aggregator` is discarded.
    pub fn resume(aggregator: Aggregator, state: ScanState) -> Self {
        let active = state.active.filter(|id| {
            let known = aggregator.contains(*id);
            if !known {
                tracing::warn!(id = id.0, "scan: restored active entry out of range, ignoring");
            }
            known
        });

        Self {
            classifier: LineClassifier::new(),
            aggregator,
            capturer: TraceCapturer::from_state(state.capture),
            active,
            stats: ScanStats::default(),
        }
    }

    /// Consume `reader` to end of stream and return the bytes read.
    ///
    /// The continuation run still open at end of stream is applied to its
    /// entry but kept in the capturer, so appending more lines later
    /// extends it rather than starting over.
    pub fn scan<R: BufRead>(&mut self, mut reader: R) -> std::io::Result<u64> {
        let mut consumed = 0u64;
        let mut buf = Vec::with_capacity(256);
        let mut active = self.active.take();

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }
            consumed += read as u64;

            let line = decode_line(&buf);
            active = self.step(&line, active);
        }

        if let Some(pending) = self.capturer.pending() {
            self.apply(active, pending);
        }

        self.active = active;
        self.stats.bytes += consumed;
        Ok(consumed)
    }

    /// Process one line given the currently active entry; returns the
    /// entry that is active afterwards.
    pub fn step(&mut self, line: &str, active: Option<EntryId>) -> Option<EntryId> {
        self.stats.lines += 1;

        // Inside a trace, frame grammar takes precedence over headers
        let header = if self.capturer.in_trace() && trace_frame(line).is_some() {
            None
        } else {
            self.classifier.classify(line)
        };

        if let Some(header) = header {
            self.stats.headers += 1;
            if let Some(closed) = self.capturer.begin_record(&header.message) {
                self.apply(active, closed);
            }
            let observation = self.aggregator.observe(&header);
            match observation {
                Observation::Created(_) => self.stats.new_entries += 1,
                Observation::Repeated(_) => self.stats.repeat_hits += 1,
            }
            return Some(observation.id());
        }

        self.stats.continuation_lines += 1;
        if active.is_none() {
            self.stats.orphan_lines += 1;
        }
        if let Some(finished) = self.capturer.feed(line) {
            self.apply(active, finished);
        }
        active
    }

    fn apply(&mut self, target: Option<EntryId>, attachment: Attachment) {
        match target {
            Some(id) => self.aggregator.attach(id, attachment),
            None => tracing::trace!("scan: continuation text before first entry dropped"),
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn state(&self) -> ScanState {
        ScanState {
            active: self.active,
            capture: self.capturer.state().clone(),
        }
    }

    pub fn finish(self) -> (Aggregator, ScanState, ScanStats) {
        let state = ScanState {
            active: self.active,
            capture: self.capturer.state().clone(),
        };
        (self.aggregator, state, self.stats)
    }
}

/// Strip the line terminator and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && raw[end - 1] == b'\r' {
        end -= 1;
    }
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

//! Trace / context capture for the continuation lines of a record.
//!
//! Continuation lines never describe the record that follows them: a stack
//! trace or free text after a header belongs to that header's entry. The
//! capturer only accumulates; the scanner applies each [`Attachment`] to
//! whichever entry was active when the run began.

use serde::{Deserialize, Serialize};

use super::pattern::{is_trace_introducer, trace_frame};

/// Where the capturer is within the current continuation run.
///
/// Persisted with the cache so that a run split across two invocations is
/// finished exactly as a single pass would have finished it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaptureState {
    /// At the start of a run; the next continuation line decides the mode.
    #[default]
    Scanning,
    InTrace { frames: Vec<String> },
    InExtra { lines: Vec<String> },
}

/// Text to attach to the previously active entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Trace(String),
    Extra(String),
}

#[derive(Debug, Default)]
pub struct TraceCapturer {
    state: CaptureState,
}

impl TraceCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a persisted state.
    pub fn from_state(state: CaptureState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn in_trace(&self) -> bool {
        matches!(self.state, CaptureState::InTrace { .. })
    }

    /// A header line closes the current run and opens a new one.
    ///
    /// Returns the closed run's attachment. A header whose own message ends
    /// with `stack trace:` starts the new run directly in trace mode.
    pub fn begin_record(&mut self, header_message: &str) -> Option<Attachment> {
        let next = if is_trace_introducer(header_message) {
            CaptureState::InTrace { frames: Vec::new() }
        } else {
            CaptureState::Scanning
        };
        let closed = std::mem::replace(&mut self.state, next);
        attachment_for(&closed)
    }

    /// Feed one continuation line.
    ///
    /// Returns an attachment only when a trace ends because a non-frame
    /// line arrived; that line then starts an extra-text run.
    pub fn feed(&mut self, line: &str) -> Option<Attachment> {
        match &mut self.state {
            CaptureState::Scanning => {
                if is_trace_introducer(line) {
                    tracing::trace!("capture: stack trace introducer");
                    self.state = CaptureState::InTrace { frames: Vec::new() };
                } else {
                    self.state = CaptureState::InExtra {
                        lines: vec![line.to_string()],
                    };
                }
                None
            }
            CaptureState::InTrace { frames } => {
                if let Some((pattern, text)) = trace_frame(line) {
                    tracing::trace!(pattern = ?pattern, "capture: trace frame");
                    frames.push(text.to_string());
                    None
                } else if is_trace_introducer(line) {
                    None
                } else {
                    let finished = join(frames).map(Attachment::Trace);
                    self.state = CaptureState::InExtra {
                        lines: vec![line.to_string()],
                    };
                    finished
                }
            }
            CaptureState::InExtra { lines } => {
                lines.push(line.to_string());
                None
            }
        }
    }

    /// Attachment for the run in progress, leaving the state untouched so
    /// that a later invocation can keep extending it.
    pub fn pending(&self) -> Option<Attachment> {
        attachment_for(&self.state)
    }
}

fn attachment_for(state: &CaptureState) -> Option<Attachment> {
    match state {
        CaptureState::Scanning => None,
        CaptureState::InTrace { frames } => join(frames).map(Attachment::Trace),
        CaptureState::InExtra { lines } => join(lines).map(Attachment::Extra),
    }
}

fn join(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

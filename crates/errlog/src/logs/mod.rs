//! Logs module — record capture, dedup aggregation, locations and ordering.

pub mod aggregate;
pub mod capture;
pub mod location;
pub mod pattern;
pub mod scan;
pub mod sort;
pub mod types;

pub use aggregate::{Aggregator, EntryId, LogEntry, Observation};
pub use capture::{Attachment, CaptureState, TraceCapturer};
pub use location::{LocationExtractor, SourceLocation};
pub use scan::{ScanState, ScanStats, Scanner};
pub use sort::{sort_records, SortDirection, SortKey};
pub use types::{normalize, TypeRegistry};

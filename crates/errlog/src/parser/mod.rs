/// Header line classification
///
/// Decides whether a raw error-log line opens a new record and, if so,
/// decomposes it into timestamp, type label and message.
///
/// # Architecture
///
/// - `traits.rs`: the `HeaderGrammar` seam implemented per log producer
/// - `classifier.rs`: ordered grammar list, first match wins
/// - `formats/`: individual producer grammars
/// - `timestamp.rs`: bracketed timestamp parsing
/// - `model.rs`: classified header types
///
/// Adding a producer format means adding one grammar to `formats/` and
/// registering it in `LineClassifier::new`.

pub mod traits;
pub mod classifier;
pub mod formats;
pub mod model;
pub mod timestamp;

// Re-export commonly used types
pub use classifier::LineClassifier;
pub use model::{HeaderLine, Producer};
pub use traits::HeaderGrammar;

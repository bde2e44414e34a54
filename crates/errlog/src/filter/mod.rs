//! Filter module — regex matching and entry selection.

pub mod engine;
pub mod select;

pub use engine::{FilterEngine, FilterError};
pub use select::EntryFilter;

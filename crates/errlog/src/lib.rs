// Domain-driven module structure for the errlog viewer.

// Core infrastructure
pub mod error;
pub mod filter;
pub mod parser;

// Domain modules
pub mod cache;
pub mod cli;
pub mod conf;
pub mod logs;
pub mod report;
pub mod runtime;

pub use error::{CacheError, Result, ViewerError};

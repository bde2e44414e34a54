use std::sync::atomic::{AtomicU64, Ordering};
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

#[derive(Debug, Default)]
pub struct FilterStats {
    pub fields_checked: AtomicU64,
    pub fields_matched: AtomicU64,
    pub bytes_processed: AtomicU64,
}

/// Single compiled pattern applied to one text field of an entry
/// (its path, or its message when it has no path).
pub struct FilterEngine {
    matcher: RegexMatcher,
    stats: FilterStats,
}

impl FilterEngine {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, FilterError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(!case_sensitive)
            .multi_line(false)
            .build(pattern)
            .map_err(|e| FilterError::InvalidRegex(e.to_string()))?;

        Ok(Self {
            matcher,
            stats: FilterStats::default(),
        })
    }

    #[inline]
    pub fn is_match(&self, text: &[u8]) -> bool {
        self.stats.fields_checked.fetch_add(1, Ordering::Relaxed);
        self.stats.bytes_processed.fetch_add(text.len() as u64, Ordering::Relaxed);

        let matches = self.matcher.is_match(text).unwrap_or(false);
        if matches {
            self.stats.fields_matched.fetch_add(1, Ordering::Relaxed);
        }
        matches
    }

    pub fn stats(&self) -> (u64, u64, u64) {
        (
            self.stats.fields_checked.load(Ordering::Relaxed),
            self.stats.fields_matched.load(Ordering::Relaxed),
            self.stats.bytes_processed.load(Ordering::Relaxed),
        )
    }
}

use serde::{Deserialize, Serialize};

/// Which producer grammar recognised a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Producer {
    /// `PHP <Type>:  message`
    Engine,
    /// `ojs2: <Type>:  message` or `ojs2 <word> <word>  message`
    Ojs,
    /// `WordPress <word> <word>  message` and `<word> has produced <word> <word>  message`
    Subject,
}

/// Raw grammar output before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarMatch {
    /// Type label exactly as written by the producer
    pub label: String,
    /// Message body, untrimmed
    pub message: String,
}

impl GrammarMatch {
    pub fn new(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
        }
    }
}

/// A line that opens a new error record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// Epoch seconds; `0` when the bracketed text is not a known timestamp
    pub timestamp: i64,
    /// Bracket contents as written
    pub raw_time: String,
    /// Lower-cased, trimmed type label (`"fatal error"`)
    pub label: String,
    /// Trimmed message body; the aggregation key
    pub message: String,
    pub producer: Producer,
}

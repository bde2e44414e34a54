use super::formats::*;
use super::model::HeaderLine;
use super::timestamp::parse_timestamp;
use super::traits::HeaderGrammar;

/// Header line classifier.
///
/// A header is `[<timestamp>] <producer-marker> <message>`. The bracketed
/// timestamp is split off first, then the grammars are tried in a fixed
/// priority order and the first match wins. Anything else is a
/// continuation line.
pub struct LineClassifier {
    grammars: Vec<Box<dyn HeaderGrammar>>,
}

impl LineClassifier {
    pub fn new() -> Self {
        let grammars: Vec<Box<dyn HeaderGrammar>> = vec![
            // Order matters: the engine form wins over the producer phrases
            Box::new(EngineGrammar),
            Box::new(OjsGrammar),
            Box::new(SubjectGrammar),
        ];

        Self { grammars }
    }

    /// Build a classifier from an explicit grammar list, tried in order.
    pub fn with_grammars(grammars: Vec<Box<dyn HeaderGrammar>>) -> Self {
        Self { grammars }
    }

    /// Classify one line (without its newline). `None` means continuation.
    pub fn classify(&self, line: &str) -> Option<HeaderLine> {
        let (raw_time, rest) = split_bracketed_time(line)?;

        self.grammars.iter().find_map(|grammar| {
            let found = grammar.parse(rest)?;
            let timestamp = parse_timestamp(raw_time).unwrap_or_else(|| {
                tracing::debug!(raw_time, "classifier: unrecognised timestamp, using 0");
                0
            });
            Some(HeaderLine {
                timestamp,
                raw_time: raw_time.to_string(),
                label: found.label.trim().to_lowercase(),
                message: found.message.trim().to_string(),
                producer: grammar.producer(),
            })
        })
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `[time] rest` into `("time", "rest")`. Exactly one space must
/// follow the closing bracket.
pub(crate) fn split_bracketed_time(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix('[')?;
    let close = inner.find(']')?;
    let rest = inner[close + 1..].strip_prefix(' ')?;
    Some((&inner[..close], rest))
}

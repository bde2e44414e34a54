use std::sync::LazyLock;

use regex::Regex;

use crate::parser::traits::{GrammarMatch, HeaderGrammar, Producer};

/// `PHP Warning:  Undefined variable $x in /var/www/a.php on line 3`
///
/// The label runs up to the first colon that is followed by whitespace,
/// so `PHP Fatal error:  Uncaught Error: boom` yields `Fatal error`.
static ENGINE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PHP (?P<label>.*?):\s+(?P<msg>.*)$").expect("Invalid ENGINE_HEADER regex")
});

/// Generic "engine: message" grammar written by the PHP runtime.
pub struct EngineGrammar;

impl HeaderGrammar for EngineGrammar {
    fn parse(&self, rest: &str) -> Option<GrammarMatch> {
        let caps = ENGINE_HEADER.captures(rest)?;
        Some(GrammarMatch::new(&caps["label"], &caps["msg"]))
    }

    fn producer(&self) -> Producer {
        Producer::Engine
    }
}

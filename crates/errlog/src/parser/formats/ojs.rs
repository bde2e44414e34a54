use std::sync::LazyLock;

use regex::Regex;

use crate::parser::traits::{GrammarMatch, HeaderGrammar, Producer};

/// Every OJS record is filed under this label regardless of its own.
pub const OJS_LABEL: &str = "ojs2 application";

static OJS_COLON_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ojs2: (?:.*?):\s+(?P<msg>.*)$").expect("Invalid OJS_COLON_HEADER regex")
});

static OJS_PHRASE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ojs2\s+\w+ \w+\s+(?P<msg>.*)$").expect("Invalid OJS_PHRASE_HEADER regex")
});

/// Open Journal Systems writes both `ojs2: <Type>:  msg` and
/// `ojs2 <word> <word>  msg`.
pub struct OjsGrammar;

impl HeaderGrammar for OjsGrammar {
    fn parse(&self, rest: &str) -> Option<GrammarMatch> {
        let caps = OJS_COLON_HEADER
            .captures(rest)
            .or_else(|| OJS_PHRASE_HEADER.captures(rest))?;
        Some(GrammarMatch::new(OJS_LABEL, &caps["msg"]))
    }

    fn producer(&self) -> Producer {
        Producer::Ojs
    }
}

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::traits::{GrammarMatch, HeaderGrammar, Producer};

/// `WordPress database error Table 'wp_x' doesn't exist ...`
/// `Plugin has produced an error  ...`
static SUBJECT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<label>(?:WordPress|\w+ has produced)\s+\w+ \w+)\s+(?P<msg>.*)$")
        .expect("Invalid SUBJECT_HEADER regex")
});

/// "SUBJECT verb verb" grammar; the whole phrase is the label.
pub struct SubjectGrammar;

impl HeaderGrammar for SubjectGrammar {
    fn parse(&self, rest: &str) -> Option<GrammarMatch> {
        let caps = SUBJECT_HEADER.captures(rest)?;
        Some(GrammarMatch::new(&caps["label"], &caps["msg"]))
    }

    fn producer(&self) -> Producer {
        Producer::Subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wordpress_database_error() {
        let m = SubjectGrammar
            .parse("WordPress database error Table 'wp.wp_posts' doesn't exist for query SELECT 1")
            .unwrap();
        assert_eq!(m.label, "WordPress database error");
        assert_eq!(m.message, "Table 'wp.wp_posts' doesn't exist for query SELECT 1");
    }

    #[test]
    fn test_has_produced_phrase() {
        let m = SubjectGrammar
            .parse("Theme has produced an error  Missing template part")
            .unwrap();
        assert_eq!(m.label, "Theme has produced an error");
        assert_eq!(m.message, "Missing template part");
    }

    #[test]
    fn test_subject_needs_message() {
        assert!(SubjectGrammar.parse("WordPress database error").is_none());
    }
}

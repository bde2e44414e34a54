pub use super::model::{GrammarMatch, Producer};

/// One producer's header grammar.
///
/// Grammars only see the text after the bracketed timestamp; the
/// classifier owns timestamp handling and label normalisation.
pub trait HeaderGrammar: Send + Sync {
    /// Decompose the remainder of a header line, or `None` if this
    /// producer did not write it.
    fn parse(&self, rest: &str) -> Option<GrammarMatch>;
    fn producer(&self) -> Producer;
}

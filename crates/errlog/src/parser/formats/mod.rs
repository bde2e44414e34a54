/// Individual producer header grammars

pub mod engine;
pub mod ojs;
pub mod subject;

// Re-export grammar implementations
pub use engine::EngineGrammar;
pub use ojs::OjsGrammar;
pub use subject::SubjectGrammar;

//! Answer generation: prompt assembly and citation handling

pub mod citation;
pub mod prompt;

pub use citation::{extract_citations, verify};
pub use prompt::PromptBuilder;

//! Application services behind the HTTP handlers and the import CLI

pub mod documents;
pub mod import;
pub mod rag;
pub mod redflags;
pub mod search;

pub use import::{import_directory, ImportOptions, ImportStats};
pub use rag::{RagAnswer, RagService};
pub use redflags::RedFlagsAnalyzer;

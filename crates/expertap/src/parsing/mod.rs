//! CNSC decision parsing: filename convention, text metadata, sections

pub mod codes;
pub mod decision_text;
pub mod filename;
pub mod sections;

pub use codes::{contest_type_of, describe, CriticismCode, CRITICISM_CODES};
pub use decision_text::parse_decision_text;
pub use filename::{parse_filename, FilenameMeta, FilenameParse};
pub use sections::split_sections;

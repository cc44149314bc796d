//! expertap: CNSC procurement decision store with grounded, citation-aware chat
//!
//! Decisions of the Romanian National Council for Solving Complaints are imported from
//! bulletin text files, stored in SQLite and served over a REST API. Chat, legal memos
//! and red-flag analysis answer only from retrieved decisions and cite them.

pub mod config;
pub mod error;
pub mod generation;
pub mod parsing;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod services;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use providers::{CompletionOptions, LlmProvider};
pub use server::{router, AppState, ExpertApServer};
pub use storage::DecisionDb;
pub use types::{Citation, Decision, ParsedDecision};

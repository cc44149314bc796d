//! Storage module for persistent data storage
//!
//! Provides SQLite-based persistence for CNSC decisions.

mod database;

pub use database::{BatchOutcome, DecisionDb, InsertOutcome};

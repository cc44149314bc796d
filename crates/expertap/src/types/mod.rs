//! Core types for ExpertAP

pub mod chat;
pub mod decision;
pub mod documents;
pub mod listing;
pub mod redflags;
pub mod search;

pub use chat::{
    ChatMessage, ChatRequest, ChatResponse, Citation, MemoRequest, MemoResponse, Role,
};
pub use decision::{
    ContestType, CpvSource, Decision, DecisionDetail, DecisionSection, DecisionStats,
    DecisionSummary, FilenameOutcome, Outcome, ParsedDecision, SectionKind,
};
pub use documents::{DocumentAnalyzeRequest, DocumentAnalyzeResponse, TextStats};
pub use listing::{DecisionFilter, DecisionListResponse, ListQuery};
pub use redflags::{RedFlag, RedFlagsRequest, RedFlagsResponse, Severity};
pub use search::{DecisionMatcher, SearchFilters, SearchRequest, SearchResponse, SearchResult};

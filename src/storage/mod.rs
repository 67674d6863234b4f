//! Storage module for Docglean
//!
//! This module provides the persistence layer for crawled content: documents
//! from the docs crawl, keyword definitions and synonyms from the glossary
//! crawl. All reads and writes to these tables go through this layer.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{resolve_database_path, SqliteStore};
pub use traits::{Store, StoreError, StoreResult};

/// A persisted documentation page
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: i64,
    pub url: String,
    pub content: String,
    pub token_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted glossary keyword definition
#[derive(Debug, Clone)]
pub struct KeywordRecord {
    pub id: i64,
    pub keyword: String,
    pub definition: String,
    pub category: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted synonym row
#[derive(Debug, Clone)]
pub struct SynonymRecord {
    pub id: i64,
    pub word: String,
    pub synonym_of: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Outcome of a keyword upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordUpsert {
    /// No existing row for the keyword; a new row was inserted
    Inserted,
    /// An existing row was refreshed with the new definition
    Updated,
}

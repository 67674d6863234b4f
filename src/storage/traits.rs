//! Store trait and error types

use crate::storage::{DocumentRecord, KeywordRecord, KeywordUpsert, SynonymRecord};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl StoreError {
    /// A short diagnostic hint for operators, when one applies
    ///
    /// Surfaced by the CLI next to fatal store errors so a misconfigured
    /// path or permission problem is recognizable without reading SQLite
    /// error codes.
    pub fn operator_hint(&self) -> Option<&'static str> {
        match self {
            StoreError::InvalidConnectionString(_) => Some(
                "Check the database-url value (or DATABASE_URL): expected \
                 sqlite:path, sqlite://path, or a plain file path",
            ),
            StoreError::Open { source, .. } => match source {
                rusqlite::Error::SqliteFailure(e, _) => match e.code {
                    rusqlite::ErrorCode::CannotOpen => Some(
                        "The database file could not be opened; verify the path \
                         exists and its parent directory is writable",
                    ),
                    rusqlite::ErrorCode::PermissionDenied | rusqlite::ErrorCode::ReadOnly => {
                        Some("Permission denied on the database file; check file ownership")
                    }
                    rusqlite::ErrorCode::NotADatabase => {
                        Some("The file exists but is not a SQLite database")
                    }
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for persistence backends
///
/// Check-then-write sequences are intentionally not wrapped in transactions;
/// each run is the sole writer against its store.
pub trait Store {
    // ===== Documents (docs crawl) =====

    /// Returns true when a document row exists for the URL
    fn document_exists(&self, url: &str) -> StoreResult<bool>;

    /// Inserts a new document row with current timestamps
    ///
    /// Callers check [`Store::document_exists`] first; re-crawling an
    /// existing URL skips rather than updates.
    fn insert_document(&mut self, url: &str, content: &str, token_count: u32) -> StoreResult<i64>;

    /// Gets a document by URL
    fn get_document(&self, url: &str) -> StoreResult<Option<DocumentRecord>>;

    // ===== Keyword definitions (glossary crawl) =====

    /// Inserts or refreshes a keyword definition
    ///
    /// An existing row is updated in place (definition, category,
    /// updated_at); a new row is inserted with the active flag set.
    fn upsert_keyword(
        &mut self,
        keyword: &str,
        definition: &str,
        category: &str,
    ) -> StoreResult<KeywordUpsert>;

    /// Gets a keyword definition by keyword
    fn get_keyword(&self, keyword: &str) -> StoreResult<Option<KeywordRecord>>;

    // ===== Synonyms =====

    /// Inserts a synonym pair unless it already exists
    ///
    /// Returns true when a row was inserted, false when the
    /// (word, synonym_of) pair was already present.
    fn insert_synonym(&mut self, word: &str, synonym_of: &str) -> StoreResult<bool>;

    /// Gets all synonyms recorded for a keyword
    fn get_synonyms(&self, synonym_of: &str) -> StoreResult<Vec<SynonymRecord>>;

    // ===== Statistics =====

    /// Total number of persisted documents
    fn count_documents(&self) -> StoreResult<u64>;

    /// Total number of persisted keyword definitions
    fn count_keywords(&self) -> StoreResult<u64>;

    /// Total number of persisted synonym rows
    fn count_synonyms(&self) -> StoreResult<u64>;
}

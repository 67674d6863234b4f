//! SQLite store implementation
//!
//! This module provides a SQLite-based implementation of the Store trait.
//! All queries are parameterized; no SQL is built by string interpolation.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StoreError, StoreResult};
use crate::storage::{DocumentRecord, KeywordRecord, KeywordUpsert, SynonymRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

/// Resolves a connection string into a database path
///
/// Accepted forms: `sqlite://path`, `sqlite:path`, `:memory:`, or a bare
/// file path. A string carrying any other scheme is rejected before a
/// connection is attempted.
pub fn resolve_database_path(connection_string: &str) -> Result<PathBuf, StoreError> {
    let trimmed = connection_string.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidConnectionString(
            "connection string is empty".to_string(),
        ));
    }

    if trimmed == ":memory:" {
        return Ok(PathBuf::from(trimmed));
    }

    if let Some((scheme, rest)) = trimmed.split_once("://") {
        if scheme != "sqlite" {
            return Err(StoreError::InvalidConnectionString(format!(
                "unsupported scheme '{}', expected sqlite",
                scheme
            )));
        }
        if rest.is_empty() {
            return Err(StoreError::InvalidConnectionString(
                "missing database path".to_string(),
            ));
        }
        return Ok(PathBuf::from(rest));
    }

    if let Some(rest) = trimmed.strip_prefix("sqlite:") {
        if rest.is_empty() {
            return Err(StoreError::InvalidConnectionString(
                "missing database path".to_string(),
            ));
        }
        return Ok(PathBuf::from(rest));
    }

    Ok(PathBuf::from(trimmed))
}

/// SQLite store backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database behind a connection string
    ///
    /// The schema is provisioned on open, so a fresh database file is
    /// immediately usable.
    pub fn open(connection_string: &str) -> Result<Self, StoreError> {
        let path = resolve_database_path(connection_string)?;

        let conn = Connection::open(&path).map_err(|source| StoreError::Open {
            path: path.display().to_string(),
            source,
        })?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Provision schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    // ===== Documents =====

    fn document_exists(&self, url: &str) -> StoreResult<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM documents WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(existing.is_some())
    }

    fn insert_document(&mut self, url: &str, content: &str, token_count: u32) -> StoreResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO documents (url, content, token_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![url, content, token_count, now],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::ConstraintViolation(format!("document already exists: {}", url))
                }
                other => StoreError::Sqlite(other),
            })?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_document(&self, url: &str) -> StoreResult<Option<DocumentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, content, token_count, created_at, updated_at
             FROM documents WHERE url = ?1",
        )?;

        let document = stmt
            .query_row(params![url], |row| {
                Ok(DocumentRecord {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    content: row.get(2)?,
                    token_count: row.get(3)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            })
            .optional()?;

        Ok(document)
    }

    // ===== Keyword definitions =====

    fn upsert_keyword(
        &mut self,
        keyword: &str,
        definition: &str,
        category: &str,
    ) -> StoreResult<KeywordUpsert> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM keyword_definitions WHERE keyword = ?1",
                params![keyword],
                |row| row.get(0),
            )
            .optional()?;

        let now = Utc::now().to_rfc3339();

        match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE keyword_definitions
                     SET definition = ?1, category = ?2, updated_at = ?3
                     WHERE id = ?4",
                    params![definition, category, now, id],
                )?;
                Ok(KeywordUpsert::Updated)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO keyword_definitions
                     (keyword, definition, category, is_active, created_at, updated_at)
                     VALUES (?1, ?2, ?3, 1, ?4, ?4)",
                    params![keyword, definition, category, now],
                )?;
                Ok(KeywordUpsert::Inserted)
            }
        }
    }

    fn get_keyword(&self, keyword: &str) -> StoreResult<Option<KeywordRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, keyword, definition, category, is_active, created_at, updated_at
             FROM keyword_definitions WHERE keyword = ?1",
        )?;

        let record = stmt
            .query_row(params![keyword], |row| {
                Ok(KeywordRecord {
                    id: row.get(0)?,
                    keyword: row.get(1)?,
                    definition: row.get(2)?,
                    category: row.get(3)?,
                    is_active: row.get::<_, i64>(4)? != 0,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })
            .optional()?;

        Ok(record)
    }

    // ===== Synonyms =====

    fn insert_synonym(&mut self, word: &str, synonym_of: &str) -> StoreResult<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM synonyms WHERE word = ?1 AND synonym_of = ?2",
                params![word, synonym_of],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Ok(false);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO synonyms (word, synonym_of, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![word, synonym_of, now],
        )?;

        Ok(true)
    }

    fn get_synonyms(&self, synonym_of: &str) -> StoreResult<Vec<SynonymRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, word, synonym_of, created_at, updated_at
             FROM synonyms WHERE synonym_of = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![synonym_of], |row| {
            Ok(SynonymRecord {
                id: row.get(0)?,
                word: row.get(1)?,
                synonym_of: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;

        let mut synonyms = Vec::new();
        for row in rows {
            synonyms.push(row?);
        }
        Ok(synonyms)
    }

    // ===== Statistics =====

    fn count_documents(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_keywords(&self) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM keyword_definitions",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_synonyms(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM synonyms", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

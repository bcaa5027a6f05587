/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for the generation history,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use super::connection::DatabaseConnection;
use super::models::{GenerationKind, GenerationRecord, GenerationStats};

const SELECT_COLUMNS: &str =
    "SELECT id, kind, prompt, content, narration, provider, model, content_hash, created_at FROM generations";

/// Repository for database operations
#[derive(Clone, Debug)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Compute SHA256 hash of text
    pub fn hash_text(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn parse_row(row: &Row) -> rusqlite::Result<GenerationRecord> {
        let kind: String = row.get(1)?;
        let kind = kind.parse::<GenerationKind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
        })?;

        Ok(GenerationRecord {
            id: row.get(0)?,
            kind,
            prompt: row.get(2)?,
            content: row.get(3)?,
            narration: row.get(4)?,
            provider: row.get(5)?,
            model: row.get(6)?,
            content_hash: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    /// Store a generation
    pub async fn save_generation(&self, record: &GenerationRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO generations (
                        id, kind, prompt, content, narration, provider, model, content_hash, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                    params![
                        record.id,
                        record.kind.to_string(),
                        record.prompt,
                        record.content,
                        record.narration,
                        record.provider,
                        record.model,
                        record.content_hash,
                        record.created_at,
                    ],
                )?;
                debug!("Saved {} generation {}", record.kind, record.id);
                Ok(())
            })
            .await
    }

    /// Get a generation by id
    pub async fn get_generation(&self, id: &str) -> Result<Option<GenerationRecord>> {
        let id = id.to_string();

        self.db
            .execute_async(move |conn| {
                let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
                let result = conn
                    .query_row(&sql, [&id], Self::parse_row)
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// List generations newest first, optionally filtered by kind
    pub async fn list_generations(
        &self,
        kind_filter: Option<GenerationKind>,
        limit: usize,
    ) -> Result<Vec<GenerationRecord>> {
        self.db
            .execute_async(move |conn| {
                let records = if let Some(kind) = kind_filter {
                    let sql = format!(
                        "{} WHERE kind = ?1 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
                        SELECT_COLUMNS
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    stmt.query_map(params![kind.to_string(), limit as i64], Self::parse_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?
                } else {
                    let sql = format!(
                        "{} ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                        SELECT_COLUMNS
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    stmt.query_map([limit as i64], Self::parse_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?
                };

                Ok(records)
            })
            .await
    }

    /// Most recent generation whose content hashes to `content_hash`
    pub async fn find_by_hash(&self, content_hash: &str) -> Result<Option<GenerationRecord>> {
        let content_hash = content_hash.to_string();

        self.db
            .execute_async(move |conn| {
                let sql = format!(
                    "{} WHERE content_hash = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1",
                    SELECT_COLUMNS
                );
                let result = conn
                    .query_row(&sql, [&content_hash], Self::parse_row)
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// Delete a generation, returning whether it existed
    pub async fn delete_generation(&self, id: &str) -> Result<bool> {
        let id = id.to_string();

        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM generations WHERE id = ?1", [&id])?;
                Ok(deleted > 0)
            })
            .await
    }

    /// Aggregate counts over the whole history
    pub async fn stats(&self) -> Result<GenerationStats> {
        let file_size_bytes = self.db.file_size_bytes();

        self.db
            .execute_async(move |conn| {
                let mut stats = GenerationStats {
                    file_size_bytes,
                    ..Default::default()
                };

                let mut stmt = conn.prepare("SELECT kind, COUNT(*) FROM generations GROUP BY kind")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?;

                for row in rows {
                    let (kind, count) = row?;
                    stats.total += count;
                    match kind.parse::<GenerationKind>() {
                        Ok(GenerationKind::Script) => stats.scripts = count,
                        Ok(GenerationKind::Enhancement) => stats.enhancements = count,
                        Ok(GenerationKind::Contract) => stats.contracts = count,
                        Err(_) => debug!("Ignoring unknown generation kind '{}'", kind),
                    }
                }

                stats.unique_contents = conn.query_row(
                    "SELECT COUNT(DISTINCT content_hash) FROM generations",
                    [],
                    |row| row.get(0),
                )?;

                Ok(stats)
            })
            .await
    }
}

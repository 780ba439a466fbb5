//! Claim Triage Storage Layer
//!
//! Implements the `DocumentStore` trait on SQLite. Each record is persisted
//! as a flat JSON document keyed by claim id, with a few columns lifted out
//! for listing.
//!
//! # Examples
//!
//! ```no_run
//! use triage_store::SqliteStore;
//!
//! let store = SqliteStore::new("claims.db").unwrap();
//! // Store is now ready for record operations
//! ```

#![warn(missing_docs)]

pub mod document;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use triage_domain::traits::DocumentStore;
use triage_domain::{ClaimRecord, UpsertOutcome};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `DocumentStore`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store behind a mutex or
/// give each thread its own `SqliteStore`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use triage_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("claims.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM claim_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Fetch the raw persisted document for a claim id
    pub fn get_document(&self, claim_id: &str) -> Result<Option<Map<String, Value>>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM claim_records WHERE claim_id = ?1",
                params![claim_id],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|text| Self::decode(&text)).transpose()
    }

    fn decode(text: &str) -> Result<Map<String, Value>, StoreError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::InvalidData(format!(
                "expected a JSON object, found {}",
                other
            ))),
        }
    }
}

impl DocumentStore for SqliteStore {
    type Error = StoreError;

    fn upsert(&mut self, record: &ClaimRecord) -> Result<UpsertOutcome, Self::Error> {
        let document = serde_json::to_string(&document::to_document(record))?;

        let tx = self.conn.transaction()?;
        let exists = tx
            .query_row(
                "SELECT 1 FROM claim_records WHERE claim_id = ?1",
                params![&record.claim_id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        // Full replacement: every column is overwritten from the new record
        tx.execute(
            "INSERT INTO claim_records (claim_id, document, priority, degraded, processed_on, processed_us)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(claim_id) DO UPDATE SET
             document = excluded.document,
             priority = excluded.priority,
             degraded = excluded.degraded,
             processed_on = excluded.processed_on,
             processed_us = excluded.processed_us",
            params![
                &record.claim_id,
                &document,
                &record.priority,
                record.is_degraded(),
                record.processed_on(),
                record.processed_at.timestamp_micros(),
            ],
        )?;
        tx.commit()?;

        let outcome = if exists {
            UpsertOutcome::Replaced
        } else {
            UpsertOutcome::Inserted
        };

        match outcome {
            UpsertOutcome::Replaced => info!("Updated existing claim record: {}", record.claim_id),
            UpsertOutcome::Inserted => info!("Inserted new claim record: {}", record.claim_id),
        }

        Ok(outcome)
    }

    fn get(&self, claim_id: &str) -> Result<Option<ClaimRecord>, Self::Error> {
        let record = self
            .get_document(claim_id)?
            .map(|doc| document::from_document(&doc))
            .transpose()?;

        if record.is_none() {
            debug!("Claim {} not found", claim_id);
        }
        Ok(record)
    }

    fn list(&self, limit: Option<usize>) -> Result<Vec<ClaimRecord>, Self::Error> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let mut stmt = self.conn.prepare(
            "SELECT document FROM claim_records
             ORDER BY processed_us DESC, claim_id ASC
             LIMIT ?1",
        )?;

        let documents = stmt
            .query_map(params![limit], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        documents
            .iter()
            .map(|text| Self::decode(text).and_then(|doc| document::from_document(&doc)))
            .collect()
    }
}

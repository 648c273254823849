use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// All-time best WPM and best accuracy for one word, tracked independently
#[derive(Debug, Clone, PartialEq)]
pub struct BestRecord {
    pub word: String,
    pub best_wpm: f64,
    pub best_accuracy: f64,
}

/// What an upsert did to the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Improved,
    Unchanged,
}

pub trait RecordStore {
    /// Look up a word by its exact text. A missing record is `Ok(None)`.
    fn get(&self, word: &str) -> Result<Option<BestRecord>>;

    /// Create the record, or raise either best independently when the new
    /// value is strictly greater. Runs as one read-modify-write transaction.
    fn upsert(&mut self, word: &str, wpm: f64, accuracy: f64) -> Result<UpsertOutcome>;

    /// Every record in first-seen order.
    fn list_all(&self) -> Result<Vec<BestRecord>>;
}

/// SQLite-backed record store
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open (creating if needed) the records database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                word TEXT PRIMARY KEY,
                best_wpm REAL,
                best_accuracy REAL
            )
            "#,
            [],
        )?;

        Ok(SqliteRecordStore { conn })
    }
}

impl RecordStore for SqliteRecordStore {
    fn get(&self, word: &str) -> Result<Option<BestRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT word, best_wpm, best_accuracy FROM records WHERE word = ?1",
                [word],
                |row| {
                    Ok(BestRecord {
                        word: row.get(0)?,
                        best_wpm: row.get(1)?,
                        best_accuracy: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn upsert(&mut self, word: &str, wpm: f64, accuracy: f64) -> Result<UpsertOutcome> {
        // IMMEDIATE takes the write lock before the read, so no other writer
        // can slip in between the comparison and the update.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<(f64, f64)> = tx
            .query_row(
                "SELECT best_wpm, best_accuracy FROM records WHERE word = ?1",
                [word],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let outcome = match existing {
            None => {
                tx.execute(
                    "INSERT INTO records (word, best_wpm, best_accuracy) VALUES (?1, ?2, ?3)",
                    params![word, wpm, accuracy],
                )?;
                UpsertOutcome::Created
            }
            Some((best_wpm, best_accuracy)) if wpm > best_wpm || accuracy > best_accuracy => {
                tx.execute(
                    "UPDATE records SET best_wpm = ?1, best_accuracy = ?2 WHERE word = ?3",
                    params![wpm.max(best_wpm), accuracy.max(best_accuracy), word],
                )?;
                UpsertOutcome::Improved
            }
            Some(_) => UpsertOutcome::Unchanged,
        };

        tx.commit()?;
        debug!(word, wpm, accuracy, ?outcome, "upserted best record");
        Ok(outcome)
    }

    fn list_all(&self) -> Result<Vec<BestRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT word, best_wpm, best_accuracy FROM records ORDER BY rowid")?;

        let record_iter = stmt.query_map([], |row| {
            Ok(BestRecord {
                word: row.get(0)?,
                best_wpm: row.get(1)?,
                best_accuracy: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }
}

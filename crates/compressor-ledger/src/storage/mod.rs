//! Storage layer for compressor-ledger.
//!
//! Records live in a single `SQLite` table. The rest of the crate only sees
//! the [`RecordStore`] trait, so the storage technology can change without
//! touching the views or exports.

pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{NewTestRecord, TestRecord, DATE_FORMAT};

/// Typed repository over the stored test records.
///
/// Records are append-only. There is no update or delete.
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Insert a record stamped with the current local time and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn create(&self, record: &NewTestRecord) -> Result<i64>;

    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_all(&self) -> Result<Vec<TestRecord>>;

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has this id, or another error
    /// if the store cannot be read.
    fn get(&self, id: i64) -> Result<TestRecord>;
}

/// `SQLite`-backed record store.
///
/// Holds one connection for the lifetime of the handle. Every call locks it
/// for a single statement.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then creates the `tests` table if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot
    /// be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` refuses to close the connection.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        conn.close().map_err(|(_, source)| Error::DatabaseQuery(source))?;
        info!("Database closed at {}", self.path.display());
        Ok(())
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tests", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a record with an explicit creation time.
    pub(crate) fn insert_at(&self, record: &NewTestRecord, date: NaiveDateTime) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            r"
            INSERT INTO tests (model, temperature, pressure, noise, tester, result, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                record.model,
                record.temperature,
                record.pressure,
                record.noise,
                record.tester,
                record.result,
                date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted test record with id {}", id);
        Ok(id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::storage_unavailable("connection lock poisoned"))
    }

    /// Convert a database row to a `TestRecord`.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<TestRecord> {
        let date_str: String = row.get(7)?;
        let date = NaiveDateTime::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

        Ok(TestRecord {
            id: row.get(0)?,
            model: row.get(1)?,
            temperature: row.get(2)?,
            pressure: row.get(3)?,
            noise: row.get(4)?,
            tester: row.get(5)?,
            result: row.get(6)?,
            date,
        })
    }
}

impl RecordStore for SqliteStore {
    fn create(&self, record: &NewTestRecord) -> Result<i64> {
        self.insert_at(record, Local::now().naive_local())
    }

    fn list_all(&self) -> Result<Vec<TestRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r"
            SELECT id, model, temperature, pressure, noise, tester, result, date
            FROM tests ORDER BY date DESC, id DESC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn get(&self, id: i64) -> Result<TestRecord> {
        let conn = self.lock()?;
        conn.query_row(
            r"
            SELECT id, model, temperature, pressure, noise, tester, result, date
            FROM tests WHERE id = ?1
            ",
            [id],
            Self::row_to_record,
        )
        .optional()?
        .ok_or(Error::NotFound { id })
    }
}

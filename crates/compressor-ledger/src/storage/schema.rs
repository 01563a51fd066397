//! `SQLite` schema definitions for compressor-ledger.
//!
//! The store is a single table. It is created idempotently every time a
//! store is opened; there is no versioning.

use rusqlite::Connection;

use crate::error::Result;

/// SQL statement to create the tests table.
pub const CREATE_TESTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS tests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model TEXT,
    temperature REAL,
    pressure REAL,
    noise REAL,
    tester TEXT,
    result TEXT,
    date TEXT
)
";

/// Create the schema if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_TESTS_TABLE, [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    #[test]
    fn test_create_tests_table_contains_required_columns() {
        for column in [
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "model TEXT",
            "temperature REAL",
            "pressure REAL",
            "noise REAL",
            "tester TEXT",
            "result TEXT",
            "date TEXT",
        ] {
            assert!(CREATE_TESTS_TABLE.contains(column), "missing {column}");
        }
    }

    #[test]
    fn test_initialize_schema_creates_table() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='tests'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("first init failed");
        initialize_schema(&conn).expect("second init failed");
    }

    #[test]
    fn test_no_secondary_indexes() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND tbl_name='tests' AND sql IS NOT NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }
}

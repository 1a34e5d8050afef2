//! Embedded schema bootstrap and runner.
//!
//! The schema is stored as `&str` constants and executed in order. A
//! `schema_migrations` table tracks which versions have been applied, so
//! opening an existing file is a no-op.

use gallery_common::{Error, Result};
use rusqlite::Connection;

/// V1: bucket tree.
///
/// `buckets` holds the nesting (each row names a child of `parent_id`) and the
/// per-bucket sequence counter. `entries` holds scalar key/value pairs.
/// Both cascade from their owning bucket, so deleting one row removes the
/// whole subtree. Names and keys are BLOBs, which SQLite orders bytewise.
const V1_BUCKETS: &str = r#"
CREATE TABLE buckets (
    id        INTEGER PRIMARY KEY,
    parent_id INTEGER REFERENCES buckets(id) ON DELETE CASCADE,
    name      BLOB NOT NULL,
    sequence  INTEGER NOT NULL DEFAULT 0,
    UNIQUE (parent_id, name)
);

CREATE TABLE entries (
    bucket_id INTEGER NOT NULL REFERENCES buckets(id) ON DELETE CASCADE,
    key       BLOB NOT NULL,
    value     BLOB NOT NULL,
    PRIMARY KEY (bucket_id, key)
) WITHOUT ROWID;

-- The tree root: the only bucket without a parent.
INSERT INTO buckets (id, parent_id, name) VALUES (1, NULL, x'');
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_BUCKETS)];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(Error::database)?;

        if already {
            continue;
        }

        let tx = conn.unchecked_transaction().map_err(Error::database)?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(Error::database)?;

        tx.commit().map_err(Error::database)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // second call is a no-op
        run_migrations(&conn).unwrap();

        let roots: i64 = conn
            .query_row("SELECT COUNT(*) FROM buckets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(roots, 1);
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for t in ["buckets", "entries", "schema_migrations"] {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                    [t],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "table {t} should exist");
        }
    }
}

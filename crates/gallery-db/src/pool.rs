//! Connection pool management for SQLite via r2d2.

use gallery_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::{layout, migrations};

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// File pools hold one writer plus concurrent readers.
const POOL_SIZE: u32 = 8;

/// Shared-cache memory databases fail lock conflicts with `SQLITE_LOCKED`
/// instead of waiting on `busy_timeout`, so they get a single connection.
const MEMORY_POOL_SIZE: u32 = 1;

/// Initialize a database pool backed by a file on disk.
///
/// Creates the SQLite file if it does not exist, enables foreign keys and
/// WAL journal mode on every new connection, bootstraps the bucket schema,
/// and ensures the top-level galleries bucket exists. WAL gives readers a
/// stable snapshot while a single writer commits.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
    });

    bootstrap(Pool::builder().max_size(POOL_SIZE), manager)
}

/// Initialize an in-memory database pool (useful for tests).
///
/// Each call creates a uniquely-named shared-cache database so parallel
/// tests do not interfere. The pool's one connection is never reaped, since
/// the database disappears with its last connection; callers queue on the
/// pool instead of on SQLite locks.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:gallerydb_{n}?mode=memory&cache=shared");

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let builder = Pool::builder()
        .max_size(MEMORY_POOL_SIZE)
        .idle_timeout(None)
        .max_lifetime(None);
    bootstrap(builder, manager)
}

fn bootstrap(
    builder: r2d2::Builder<SqliteConnectionManager>,
    manager: SqliteConnectionManager,
) -> Result<DbPool> {
    let pool = builder
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;
    layout::ensure_tree(&conn)?;
    drop(conn);

    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}

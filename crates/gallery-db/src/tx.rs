//! Transaction helpers.
//!
//! [`read`] opens a deferred transaction: under WAL its first read pins a
//! snapshot that concurrent writers cannot disturb. [`write`] opens an
//! immediate transaction, which takes the database's single write lock up
//! front so writers are serialized. In both cases the closure's error drops
//! the transaction, which rolls it back.

use gallery_common::{Error, Result};
use rusqlite::{Connection, TransactionBehavior};

use crate::pool::{get_conn, DbPool};

/// Run `f` inside a read-only snapshot transaction.
pub fn read<T>(pool: &DbPool, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
    run(pool, TransactionBehavior::Deferred, f)
}

/// Run `f` inside a serialized write transaction and commit on success.
pub fn write<T>(pool: &DbPool, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
    run(pool, TransactionBehavior::Immediate, f)
}

fn run<T>(
    pool: &DbPool,
    behavior: TransactionBehavior,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    let mut conn = get_conn(pool)?;
    let tx = conn
        .transaction_with_behavior(behavior)
        .map_err(Error::database)?;

    let value = f(&tx)?;

    tx.commit().map_err(Error::database)?;
    Ok(value)
}

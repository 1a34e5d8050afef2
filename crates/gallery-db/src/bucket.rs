//! Nested bucket primitives over the `buckets` / `entries` tables.
//!
//! A [`Bucket`] is a handle on one row of `buckets` borrowed from an open
//! connection (normally a transaction). Buckets contain two disjoint
//! namespaces: child buckets, addressed by name, and scalar entries,
//! addressed by key. Both are ordered bytewise, so big-endian encoded
//! integers iterate in ascending numeric order.
//!
//! Handles are only meaningful for the lifetime of the transaction that
//! produced them; every call goes straight to the engine.

use gallery_common::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Row id of the tree root created by the schema bootstrap.
pub const ROOT_BUCKET_ID: i64 = 1;

/// Handle on a single bucket within an open connection.
#[derive(Clone, Copy)]
pub struct Bucket<'c> {
    conn: &'c Connection,
    id: i64,
}

impl std::fmt::Debug for Bucket<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bucket").field("id", &self.id).finish()
    }
}

impl<'c> Bucket<'c> {
    /// The tree root.
    pub fn root(conn: &'c Connection) -> Self {
        Self {
            conn,
            id: ROOT_BUCKET_ID,
        }
    }

    /// Look up a direct child bucket by name.
    pub fn bucket(&self, name: &[u8]) -> Result<Option<Bucket<'c>>> {
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM buckets WHERE parent_id = ?1 AND name = ?2",
                params![self.id, name],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::database)?;

        Ok(id.map(|id| self.with_id(id)))
    }

    /// Create a new child bucket. Fails if a child with this name exists.
    pub fn create_bucket(&self, name: &[u8]) -> Result<Bucket<'c>> {
        if self.bucket(name)?.is_some() {
            return Err(Error::Internal(format!(
                "bucket {} already exists under bucket {}",
                display_name(name),
                self.id
            )));
        }

        self.conn
            .execute(
                "INSERT INTO buckets (parent_id, name) VALUES (?1, ?2)",
                params![self.id, name],
            )
            .map_err(Error::database)?;

        Ok(self.with_id(self.conn.last_insert_rowid()))
    }

    /// Return the named child bucket, creating it if it does not exist.
    pub fn create_bucket_if_not_exists(&self, name: &[u8]) -> Result<Bucket<'c>> {
        match self.bucket(name)? {
            Some(bucket) => Ok(bucket),
            None => self.create_bucket(name),
        }
    }

    /// Delete a child bucket together with everything nested beneath it.
    ///
    /// Returns `false` when no child with this name exists.
    pub fn delete_bucket(&self, name: &[u8]) -> Result<bool> {
        let n = self
            .conn
            .execute(
                "DELETE FROM buckets WHERE parent_id = ?1 AND name = ?2",
                params![self.id, name],
            )
            .map_err(Error::database)?;
        Ok(n > 0)
    }

    /// All child buckets in ascending name order.
    pub fn buckets(&self) -> Result<Vec<(Vec<u8>, Bucket<'c>)>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT name, id FROM buckets WHERE parent_id = ?1 ORDER BY name")
            .map_err(Error::database)?;
        let rows = stmt
            .query_map([self.id], |row| {
                Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(Error::database)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::database)?;

        Ok(rows
            .into_iter()
            .map(|(name, id)| (name, self.with_id(id)))
            .collect())
    }

    /// Name of the first child bucket in ascending order, if any.
    pub fn first_bucket_name(&self) -> Result<Option<Vec<u8>>> {
        self.conn
            .query_row(
                "SELECT name FROM buckets WHERE parent_id = ?1 ORDER BY name LIMIT 1",
                [self.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::database)
    }

    /// Read a scalar entry.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.conn
            .query_row(
                "SELECT value FROM entries WHERE bucket_id = ?1 AND key = ?2",
                params![self.id, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::database)
    }

    /// Write a scalar entry, replacing any previous value.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO entries (bucket_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT (bucket_id, key) DO UPDATE SET value = excluded.value",
                params![self.id, key, value],
            )
            .map_err(Error::database)?;
        Ok(())
    }

    /// Remove a scalar entry. Returns `false` if it was absent.
    pub fn delete(&self, key: &[u8]) -> Result<bool> {
        let n = self
            .conn
            .execute(
                "DELETE FROM entries WHERE bucket_id = ?1 AND key = ?2",
                params![self.id, key],
            )
            .map_err(Error::database)?;
        Ok(n > 0)
    }

    /// Current value of this bucket's sequence counter.
    pub fn sequence(&self) -> Result<u64> {
        let seq: i64 = self
            .conn
            .query_row("SELECT sequence FROM buckets WHERE id = ?1", [self.id], |row| {
                row.get(0)
            })
            .map_err(Error::database)?;
        u64::try_from(seq).map_err(|_| Error::Internal(format!("negative sequence {seq}")))
    }

    /// Increment and return this bucket's sequence counter.
    ///
    /// The counter lives on the bucket itself, not on its children, so values
    /// are never handed out twice even after children are deleted.
    pub fn next_sequence(&self) -> Result<u64> {
        self.conn
            .execute(
                "UPDATE buckets SET sequence = sequence + 1 WHERE id = ?1",
                [self.id],
            )
            .map_err(Error::database)?;
        self.sequence()
    }

    fn with_id(&self, id: i64) -> Bucket<'c> {
        Bucket {
            conn: self.conn,
            id,
        }
    }
}

/// Render a bucket name for error messages.
fn display_name(name: &[u8]) -> String {
    match std::str::from_utf8(name) {
        Ok(s) if s.chars().all(|c| !c.is_control()) => format!("'{s}'"),
        _ => format!("0x{}", name.iter().map(|b| format!("{b:02x}")).collect::<String>()),
    }
}

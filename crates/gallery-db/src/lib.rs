//! Gallery-DB: nested-bucket storage, schema bootstrap, and query operations.
//!
//! This crate layers a bolt-style bucket tree (named sub-buckets, ordered
//! keys, per-bucket sequences) on a single SQLite file accessed through
//! rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `pool` - Connection pool management
//! - `migrations` - Schema bootstrap
//! - `tx` - Read (snapshot) and write (serialized) transaction helpers
//! - `bucket` - Nested bucket primitives
//! - `keys` - Identifier and timestamp key encoding
//! - `layout` - Bucket names and path descent for the gallery tree
//! - `models` - Entity structs returned by queries
//! - `queries` - Gallery, album, and image operations
//!
//! # Example
//!
//! ```no_run
//! use gallery_db::pool::init_pool;
//! use gallery_db::queries::galleries;
//! use gallery_db::tx;
//!
//! let pool = init_pool("/var/lib/gallery/gallery.db").unwrap();
//! let id = tx::write(&pool, |conn| galleries::create_gallery(conn, "Holidays")).unwrap();
//! let gallery = tx::read(&pool, |conn| galleries::get_gallery(conn, id)).unwrap();
//! println!("Created gallery {}: {}", gallery.id, gallery.title);
//! ```

pub mod bucket;
pub mod keys;
pub mod layout;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod tx;

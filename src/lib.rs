//! Gallery - hierarchical gallery/album/image store
//!
//! This library crate exposes the store, ingest pipeline, configuration,
//! and HTTP router for the binary and for integration testing.

pub mod config;
pub mod images;
pub mod server;
pub mod store;

pub use store::GalleryStore;

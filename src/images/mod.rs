//! Image ingestion: decode an upload, derive a bounded thumbnail, and
//! re-encode both renditions as JPEG.
//!
//! The pipeline is a pure transformation with no storage access; the store
//! runs it before opening its write transaction.

mod pipeline;
mod resample;

pub use pipeline::{fit_within, ingest, IngestOptions, Ingested};
pub use resample::resize;

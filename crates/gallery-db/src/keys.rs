//! Key and value encodings.
//!
//! Identifiers are fixed-width big-endian `u64`, so bytewise key order is
//! numeric order (`2` sorts before `10`). Timestamps are stored as
//! big-endian nanoseconds since the Unix epoch.

use chrono::{DateTime, Utc};
use gallery_common::{Error, Result};

/// Encode an identifier as a bucket name.
pub fn encode_id(id: impl Into<u64>) -> [u8; 8] {
    id.into().to_be_bytes()
}

/// Decode a bucket name produced by [`encode_id`].
pub fn decode_id(key: &[u8]) -> Result<u64> {
    <[u8; 8]>::try_from(key)
        .map(u64::from_be_bytes)
        .map_err(|_| Error::Internal(format!("malformed id key of {} bytes", key.len())))
}

/// Encode a timestamp value.
pub fn encode_timestamp(at: DateTime<Utc>) -> Result<[u8; 8]> {
    let nanos = at
        .timestamp_nanos_opt()
        .ok_or_else(|| Error::Internal(format!("timestamp out of range: {at}")))?;
    let nanos = u64::try_from(nanos)
        .map_err(|_| Error::Internal(format!("timestamp before epoch: {at}")))?;
    Ok(nanos.to_be_bytes())
}

/// Decode a timestamp value produced by [`encode_timestamp`].
pub fn decode_timestamp(value: &[u8]) -> Result<DateTime<Utc>> {
    let nanos = decode_id(value)?;
    let nanos = i64::try_from(nanos)
        .map_err(|_| Error::Internal(format!("timestamp out of range: {nanos}")))?;
    Ok(DateTime::from_timestamp_nanos(nanos))
}

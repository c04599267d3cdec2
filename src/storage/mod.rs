//! On-disk persistence: one serialized blob per key.

mod blob;

pub use blob::BlobStore;

use thiserror::Error;

/// Errors raised by the persistence layer.
///
/// Validation failures and missing records are ordinary `bool`/`Option`
/// results in the registry; only I/O and serialization problems surface
/// as errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

//! Custom error types for the metop-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Every variant is fatal for the current operation: the format is
/// deterministic, so a second attempt on the same bytes yields the same
/// failure and nothing is ever retried.
#[derive(Debug, Error)]
pub enum MetopError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes were available than a fixed-size field requires.
    #[error("Truncated input while reading {context}")]
    TruncatedInput { context: &'static str },

    /// A structural field (record class, instrument group, pointer target)
    /// has an unexpected value.
    #[error("Bad product: {context} is {actual}, expected {expected}")]
    BadProduct {
        context: &'static str,
        expected: String,
        actual: String,
    },

    /// The product is structurally valid but outside the supported
    /// envelope (unknown sample rate, wrong scanline width, more than one
    /// secondary header).
    #[error("Unsupported product: {0}")]
    UnsupportedProduct(String),

    /// The declared record layout does not reproduce the actual file
    /// length.
    #[error("Product has wrong file size: expected {expected} bytes, actual {actual} bytes")]
    InconsistentSize { expected: u64, actual: u64 },

    /// A header value expected to be numeric failed to parse.
    #[error("Header value {value:?} for key {key} is not a valid integer")]
    FormatError { key: String, value: String },

    /// A typed accessor was invoked for a key absent from a header block.
    #[error("Header key not present: {0}")]
    MissingKey(String),

    /// A mutex lock was poisoned, indicating a panic in another thread
    /// holding the lock.
    #[error("A mutex lock was poisoned, indicating a panic in another thread holding the lock.")]
    LockPoisoned,
}

/// A convenience `Result` type alias using the crate's `MetopError` type.
pub type Result<T> = std::result::Result<T, MetopError>;

//! Upload error types
//!
//! Every variant is a request-scoped fault: the router logs it and hands it
//! back to hyper, which closes the connection without writing a response.

use thiserror::Error;

/// Boxed error from the request body stream
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Faults raised while storing an upload
#[derive(Debug, Error)]
pub enum UploadError {
    /// PUT request without a `Content-Length` header
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// `Content-Length` is not a non-negative integer
    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),

    /// Client stopped sending before the declared length arrived
    #[error("timed out reading request body after {received} of {expected} bytes")]
    ReadTimeout { received: u64, expected: u64 },

    /// Body stream ended before the declared length
    #[error("request body ended after {received} of {expected} bytes")]
    Truncated { received: u64, expected: u64 },

    /// Transport error while reading the body
    #[error("failed to read request body: {0}")]
    Body(#[source] BoxError),

    /// Filesystem error (directory creation, open, write)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for wavedeck.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Note that a malformed inbound frame is
//! *not* an error anywhere in this library: the stream parser recovers by
//! resynchronizing and the bytes are silently discarded. [`Error`] covers
//! transport and configuration failures only.

/// The error type for all wavedeck operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port open/read/write failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (e.g. a test transport was fed unexpected data).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No data arrived within the read deadline.
    ///
    /// During `poll()` this is the normal "nothing buffered" signal and is
    /// absorbed internally; it only escapes on transports where a zero
    /// timeout is meaningless.
    #[error("timeout waiting for data")]
    Timeout,

    /// An invalid parameter was passed to a builder or driver method.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No connection to the device has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the device was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

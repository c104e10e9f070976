//! Error types for bearcat.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. The first three variants are the
//! device-reported taxonomy recovered from textual responses; the rest cover
//! caller mistakes and transport failures.

/// The error type for all bearcat operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scanner answered `ERR`: it does not know this mnemonic.
    ///
    /// Probing tools rely on this variant to discover which (possibly
    /// undocumented) commands a given model supports.
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// The scanner answered `NG`: the mnemonic exists but was rejected,
    /// usually because the scanner is in the wrong mode or an argument is
    /// out of range.
    #[error("command invalid: {0}")]
    CommandInvalid(String),

    /// The response could not be interpreted: it did not echo the command,
    /// carried the wrong number of fields, was empty, or held a malformed
    /// value.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    /// A transport-level error (serial port, TCP socket).
    #[error("transport error: {0}")]
    Transport(String),

    /// Timed out establishing a connection.
    #[error("timeout waiting for connection")]
    Timeout,

    /// The scanner model does not implement the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// An invalid parameter was passed to a scanner command. Raised before
    /// anything is written to the transport.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No connection to the scanner has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the scanner was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the scanner itself reported the failure (`ERR`, `NG`, or an
    /// uninterpretable reply), as opposed to a local or transport problem.
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Error::CommandNotFound(_) | Error::CommandInvalid(_) | Error::UnexpectedResult(_)
        )
    }
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

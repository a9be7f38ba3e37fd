use std::io;
use thiserror::Error;

/// Errors surfaced by a connection and passed through the facade untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// The server is unreachable, the socket failed, or the handle is closed.
    #[error("connection error: {0}")]
    Connection(#[from] io::Error),

    /// The server rejected the credential sent with `AUTH`.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The server rejected the index sent with `SELECT`.
    #[error("invalid database: {0}")]
    InvalidDatabase(String),

    /// Malformed frame or a reply of an unexpected shape.
    #[error("protocol error; {0}")]
    Protocol(String),

    /// The server answered with an error reply.
    #[error("{0}")]
    Reply(String),

    /// Refused locally because a `MULTI` block is open.
    #[error("transaction error: {0}")]
    Transaction(String),
}

impl Error {
    /// Error returned by every operation once the handle is closed.
    pub(crate) fn closed() -> Error {
        Error::Connection(io::Error::new(io::ErrorKind::NotConnected, "connection closed"))
    }
}

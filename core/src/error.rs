//! Error types for the list client.
//!
//! # Design
//! Three kinds only. The status check is the client's own rule, so it gets a
//! variant with the observed code. Everything the transport reports is split
//! into I/O failures (refused, reset, timed out, short read) and protocol
//! failures (anything else about the exchange).

use thiserror::Error;

/// Errors returned by `ListClient` and `Transport` implementations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a status other than 200.
    #[error("unexpected status: expected 200, got {status}")]
    UnexpectedStatus { status: u16 },

    /// The HTTP exchange was malformed or could not be carried out.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The connection failed, timed out, or the body could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The status code carried by `UnexpectedStatus`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}

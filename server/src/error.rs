//! Errors that abort the server. Per-connection failures never reach here;
//! they are logged and end only the affected connection.

use shared::PuzzleError;
use std::net::SocketAddr;
use thiserror::Error;

/// Error type of the outbound sink and inbound stream seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid address {0}")]
    Address(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Puzzles(#[from] PuzzleError),
    #[error("server on {addr} stopped: {source}")]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

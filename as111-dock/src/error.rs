//! Dock session error types

use as111_transport::{ParseError, TransportError};
use thiserror::Error;

/// Errors from dock operations
#[derive(Error, Debug)]
pub enum DockError {
    /// Could not open the link to the dock
    #[error("Connection failed")]
    Connection(#[source] TransportError),

    /// Send/receive failed during one exchange
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response did not fit the expected layout
    #[error("Malformed response: {0}")]
    Decode(#[from] ParseError),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation attempted before `connect`
    #[error("Not connected")]
    NotConnected,
}

impl DockError {
    /// Whether the session can keep going after this error
    ///
    /// A dropped link is not: every later exchange would fail the same way.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DockError::Transport(TransportError::Disconnected) => false,
            DockError::Transport(_) | DockError::Decode(_) => true,
            _ => false,
        }
    }
}

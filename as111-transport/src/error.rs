//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid Bluetooth address: {0}")]
    InvalidAddress(String),

    #[error("Connection to {address} failed: {reason}")]
    ConnectFailed { address: String, reason: String },

    #[error("Device disconnected")]
    Disconnected,

    #[error("Communication timeout")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RFCOMM transport is not supported on this platform")]
    Unsupported,
}

impl TransportError {
    /// Map a raw socket error from a receive call, folding the
    /// would-block/timed-out kinds into `Timeout`.
    pub fn from_receive(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                TransportError::Timeout
            }
            _ => TransportError::Io(e),
        }
    }
}

//! Transport and frame codec for AS111 Bluetooth audio docks
//!
//! The dock speaks a small command/response protocol over an RFCOMM channel.
//! This crate provides:
//!
//! - the frame codec (request building with checksum and sequence number,
//!   fixed-offset response parsing)
//! - typed commands and responses for the known command set
//! - the `Transport` trait with an RFCOMM socket backend, a logging
//!   middleware and an in-memory backend

pub mod command;
pub mod error;
pub mod frame;
pub mod memory;
pub mod printer;
pub mod protocol;
pub mod types;

mod rfcomm;

pub use command::{
    decode_capability_payload, decode_identity, decode_volume, CapabilityResponse,
    DockCommand, DockResponse, ParseError, QueryCapabilities, QueryName, QueryVersion,
    QueryVolume, SetAlarmLed, SetDateTime, SetVolume, TextResponse, VolumeResponse,
};
pub use error::TransportError;
pub use frame::{FrameEncoder, ResponseFrame};
pub use memory::MemoryTransport;
pub use printer::{PrinterConfig, PrinterTransport};
pub use rfcomm::RfcommTransport;
pub use types::{BdAddr, TransportDeviceInfo, TransportType};

use std::time::Duration;

/// The core transport trait - all backends implement this
///
/// A transport owns one connected byte stream to one dock. Calls are
/// strictly sequential; the session holding the transport is its only user.
pub trait Transport: Send {
    /// Write one complete request frame
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Read one response, waiting at most `timeout`
    ///
    /// Returns `TransportError::Timeout` when nothing arrives in time.
    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError>;

    /// Get connection information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Close the transport
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;

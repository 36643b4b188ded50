//! Common types for transport layer

use std::fmt;
use std::str::FromStr;

use crate::error::TransportError;

/// Bluetooth device address
///
/// Stored in display order (`bytes[0]` is the first pair of `AA:BB:...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr(pub [u8; 6]);

impl BdAddr {
    /// Address bytes in the little-endian order BlueZ socket addresses use
    pub fn to_le_bytes(self) -> [u8; 6] {
        let mut b = self.0;
        b.reverse();
        b
    }
}

impl FromStr for BdAddr {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransportError::InvalidAddress(s.to_string());
        let mut bytes = [0u8; 6];
        let mut parts = s.split(':');
        for byte in bytes.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Transport type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportType {
    /// Bluetooth RFCOMM stream socket
    Rfcomm,
    /// In-process transport (tests, replay)
    Memory,
}

/// Connection identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// Remote device address
    pub address: BdAddr,
    /// RFCOMM channel
    pub channel: u8,
    /// Transport type
    pub transport_type: TransportType,
}

impl TransportDeviceInfo {
    pub fn rfcomm(address: BdAddr, channel: u8) -> Self {
        Self {
            address,
            channel,
            transport_type: TransportType::Rfcomm,
        }
    }
}

//! Protocol constants and utilities for AS111 dock communication

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Dock protocol commands
pub mod cmd {
    pub const QUERY_CAPABILITIES: u8 = 6;
    pub const QUERY_NAME: u8 = 8;
    pub const QUERY_VOLUME: u8 = 15;
    /// Multi-purpose setter; the first payload byte selects the sub-operation
    /// (see [`super::set_op`]).
    pub const SET: u8 = 17;
    pub const QUERY_VERSION: u8 = 19;

    /// Get human-readable name for command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            QUERY_CAPABILITIES => "QUERY_CAPABILITIES",
            QUERY_NAME => "QUERY_NAME",
            QUERY_VOLUME => "QUERY_VOLUME",
            SET => "SET",
            QUERY_VERSION => "QUERY_VERSION",
            _ => "UNKNOWN",
        }
    }
}

/// Sub-operations of [`cmd::SET`], carried in the first payload byte
pub mod set_op {
    pub const VOLUME: u8 = 0;
    pub const DATETIME: u8 = 8;
    pub const ALARM_LED: u8 = 24;

    /// Get human-readable name for a SET sub-operation
    pub fn name(op: u8) -> &'static str {
        match op {
            VOLUME => "VOLUME",
            DATETIME => "DATETIME",
            ALARM_LED => "ALARM_LED",
            _ => "UNKNOWN",
        }
    }
}

/// Magic first byte of every request frame
pub const PREAMBLE: u8 = 153;

/// Bytes counted by the length field in addition to the payload
/// (sequence, command, checksum)
pub const LENGTH_OVERHEAD: usize = 3;

/// Request/response header: preamble, length, sequence, command
pub const HEADER_SIZE: usize = 4;

/// Trailing checksum byte
pub const TRAILER_SIZE: usize = 1;

/// Header bytes skipped before the packed capability bytes
pub const CAPABILITY_HEADER_SIZE: usize = 8;

/// Maximum bytes read back per response
pub const MAX_RESPONSE_SIZE: usize = 255;

/// Highest volume level the dock accepts
pub const MAX_VOLUME: u8 = 32;

/// RFCOMM link constants
pub mod rfcomm {
    /// Channel the dock listens on
    pub const DEFAULT_CHANNEL: u8 = 1;
}

/// Communication timing constants
pub mod timing {
    /// Per-exchange response timeout (ms)
    pub const RESPONSE_TIMEOUT_MS: u64 = 2000;
}

/// Fixed request header, laid out as it goes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct FrameHeader {
    pub preamble: u8,
    pub length: u8,
    pub sequence: u8,
    pub command: u8,
}

/// Calculate the two's-complement checksum over command and payload
///
/// `command + sum(payload) + checksum` is always 0 modulo 256.
pub fn calculate_checksum(command: u8, payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(command, |acc, &b| acc.wrapping_add(b));
    sum.wrapping_neg()
}

/// Build a request frame
///
/// Format: `[preamble] [length] [sequence] [command] [payload...] [checksum]`
///
/// The length byte is truncated to 8 bits; payloads of the known command set
/// never come close.
pub fn build_request(sequence: u8, command: u8, payload: &[u8]) -> Vec<u8> {
    let header = FrameHeader {
        preamble: PREAMBLE,
        length: (LENGTH_OVERHEAD + payload.len()) as u8,
        sequence,
        command,
    };
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len() + TRAILER_SIZE);
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(payload);
    buf.push(calculate_checksum(command, payload));
    buf
}

/// Format bytes the way diagnostic output shows them (space separated)
pub fn format_bytes(data: &[u8], hex: bool) -> String {
    data.iter()
        .map(|b| {
            if hex {
                format!("{b:02X}")
            } else {
                b.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Request encoding and response frame parsing
//!
//! Responses are not self-describing beyond their header; payload boundaries
//! are defined purely by position. `ResponseFrame` keeps those fixed offsets
//! but hands them out through bounds-checked accessors.
//!
//! ```text
//! [preamble] [length] [sequence] [command] [payload ...] [checksum]
//!     0          1        2          3       4 .. n-1        n-1
//! ```

use tracing::trace;
use zerocopy::FromBytes;

use crate::command::ParseError;
use crate::protocol::{self, FrameHeader, HEADER_SIZE, TRAILER_SIZE};

/// Builds request frames and owns the session sequence counter.
///
/// The counter starts at 0 and is pre-incremented on every frame, so the
/// first frame carries sequence 1. It wraps from 255 to 0.
#[derive(Debug, Default, Clone)]
pub struct FrameEncoder {
    sequence: u8,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of the most recently built frame (0 before any)
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Advance the sequence counter and build the request frame
    pub fn encode(&mut self, command: u8, payload: &[u8]) -> Vec<u8> {
        self.sequence = self.sequence.wrapping_add(1);
        let frame = protocol::build_request(self.sequence, command, payload);
        trace!(
            "encoded {} seq={}: {:?}",
            protocol::cmd::name(command),
            self.sequence,
            frame
        );
        frame
    }
}

/// A response as read back from the dock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    header: FrameHeader,
    raw: Vec<u8>,
}

impl ResponseFrame {
    /// Smallest frame that still has a full header and a checksum byte
    pub const MIN_LEN: usize = HEADER_SIZE + TRAILER_SIZE;

    /// Parse raw bytes into a frame
    ///
    /// Only the length is checked; the header values are kept as received.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        if raw.len() < Self::MIN_LEN {
            return Err(ParseError::TooShort {
                expected: Self::MIN_LEN,
                got: raw.len(),
            });
        }
        let (header, _) = FrameHeader::read_from_prefix(raw).map_err(|_| ParseError::TooShort {
            expected: HEADER_SIZE,
            got: raw.len(),
        })?;
        Ok(Self {
            header,
            raw: raw.to_vec(),
        })
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn preamble(&self) -> u8 {
        self.header.preamble
    }

    pub fn length(&self) -> u8 {
        self.header.length
    }

    pub fn sequence(&self) -> u8 {
        self.header.sequence
    }

    pub fn command(&self) -> u8 {
        self.header.command
    }

    /// Bytes between the 4-byte header and the trailing checksum
    pub fn payload(&self) -> &[u8] {
        &self.raw[HEADER_SIZE..self.raw.len() - TRAILER_SIZE]
    }

    /// Trailing checksum byte
    pub fn checksum(&self) -> u8 {
        self.raw[self.raw.len() - TRAILER_SIZE]
    }

    /// The byte directly before the checksum
    pub fn last_payload_byte(&self) -> Option<u8> {
        self.payload().last().copied()
    }

    /// Payload with `skip` additional leading bytes removed
    pub fn payload_after(&self, skip: usize) -> Result<&[u8], ParseError> {
        let payload = self.payload();
        payload.get(skip..).ok_or(ParseError::TooShort {
            expected: HEADER_SIZE + skip + TRAILER_SIZE,
            got: self.raw.len(),
        })
    }

    /// Check the response against the request checksum law:
    /// command, payload and checksum sum to 0 modulo 256.
    pub fn checksum_valid(&self) -> bool {
        self.raw[3..]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_add(b))
            == 0
    }

    /// Raw bytes as received
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

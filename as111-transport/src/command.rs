//! Type-safe dock command builders and response parsers
//!
//! This module keeps the protocol quirks (fixed response offsets, zero-byte
//! dropping in text fields, zero-based months) in one place.

use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::frame::{FrameEncoder, ResponseFrame};
use crate::protocol::{cmd, set_op, CAPABILITY_HEADER_SIZE, HEADER_SIZE, MAX_VOLUME};

// =============================================================================
// Core Traits
// =============================================================================

/// A command that can be serialized to a request frame
pub trait DockCommand {
    /// Command byte (e.g., 8 for QUERY_NAME)
    const CMD: u8;

    /// Serialize the payload (everything between command byte and checksum)
    fn payload(&self) -> Vec<u8>;

    /// Build the complete frame, advancing the encoder's sequence counter
    fn encode(&self, encoder: &mut FrameEncoder) -> Vec<u8> {
        encoder.encode(Self::CMD, &self.payload())
    }
}

/// A response that can be parsed from a raw frame
pub trait DockResponse: Sized {
    /// Parse from an already length-checked frame
    fn from_frame(frame: &ResponseFrame) -> Result<Self, ParseError>;

    /// Parse from raw response bytes
    fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        Self::from_frame(&ResponseFrame::parse(raw)?)
    }
}

/// Parse error for responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooShort { expected: usize, got: usize },
    ChecksumMismatch { command: u8, checksum: u8 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected, got } => {
                write!(
                    f,
                    "Response too short: expected at least {} bytes, got {}",
                    expected, got
                )
            }
            Self::ChecksumMismatch { command, checksum } => {
                write!(
                    f,
                    "Checksum mismatch in {} response (checksum byte {})",
                    cmd::name(*command),
                    checksum
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

// =============================================================================
// Query Commands (no data, just request)
// =============================================================================

/// Generic query command with no payload
#[derive(Debug, Clone)]
pub struct QueryCommand<const CMD_BYTE: u8>;

impl<const CMD_BYTE: u8> Default for QueryCommand<CMD_BYTE> {
    fn default() -> Self {
        Self
    }
}

impl<const CMD_BYTE: u8> DockCommand for QueryCommand<CMD_BYTE> {
    const CMD: u8 = CMD_BYTE;

    fn payload(&self) -> Vec<u8> {
        vec![]
    }
}

pub type QueryName = QueryCommand<{ cmd::QUERY_NAME }>;
pub type QueryVersion = QueryCommand<{ cmd::QUERY_VERSION }>;
pub type QueryCapabilities = QueryCommand<{ cmd::QUERY_CAPABILITIES }>;

/// QUERY_VOLUME carries a single zero byte
#[derive(Debug, Clone, Default)]
pub struct QueryVolume;

impl DockCommand for QueryVolume {
    const CMD: u8 = cmd::QUERY_VOLUME;

    fn payload(&self) -> Vec<u8> {
        vec![0]
    }
}

// =============================================================================
// SET sub-operations
// =============================================================================

/// SET / VOLUME: `[0, volume]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetVolume {
    volume: u8,
}

impl SetVolume {
    /// Returns `None` above the dock's maximum of 32
    pub fn new(volume: u8) -> Option<Self> {
        (volume <= MAX_VOLUME).then_some(Self { volume })
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}

impl DockCommand for SetVolume {
    const CMD: u8 = cmd::SET;

    fn payload(&self) -> Vec<u8> {
        vec![set_op::VOLUME, self.volume]
    }
}

/// SET / ALARM_LED: `[24, on]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetAlarmLed {
    pub on: bool,
}

impl SetAlarmLed {
    pub fn new(on: bool) -> Self {
        Self { on }
    }
}

impl DockCommand for SetAlarmLed {
    const CMD: u8 = cmd::SET;

    fn payload(&self) -> Vec<u8> {
        vec![set_op::ALARM_LED, u8::from(self.on)]
    }
}

/// SET / DATETIME payload, 8 bytes.
///
/// The month goes on the wire zero-based (January = 0); the year is split
/// into century and year-of-century.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct SetDateTime {
    op: u8,
    pub century: u8,
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl SetDateTime {
    /// Build from calendar values; `month` is 1-based here.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            op: set_op::DATETIME,
            century: (year / 100) as u8,
            year: (year % 100) as u8,
            month: month.saturating_sub(1),
            day,
            hour,
            minute,
            second,
        }
    }

    /// Wire fields after the sub-operation byte
    pub fn fields(&self) -> [u8; 7] {
        [
            self.century,
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ]
    }

    /// `CCYY-MM-DD HH:MM:SS`, month shifted back to 1-based
    pub fn display(&self) -> String {
        format!(
            "{:02}{:02}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.century,
            self.year,
            self.month.saturating_add(1),
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

impl DockCommand for SetDateTime {
    const CMD: u8 = cmd::SET;

    fn payload(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Name / firmware version response.
///
/// The text sits between the 4-byte header and the checksum. Zero bytes are
/// dropped rather than treated as terminators; every other byte is taken as a
/// Latin-1 code point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub text: String,
}

impl DockResponse for TextResponse {
    fn from_frame(frame: &ResponseFrame) -> Result<Self, ParseError> {
        let text = frame
            .payload()
            .iter()
            .filter(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect();
        Ok(Self { text })
    }
}

/// Volume response: the value is the byte right before the checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeResponse {
    pub volume: u8,
}

impl DockResponse for VolumeResponse {
    fn from_frame(frame: &ResponseFrame) -> Result<Self, ParseError> {
        let volume = frame.last_payload_byte().ok_or(ParseError::TooShort {
            expected: ResponseFrame::MIN_LEN + 1,
            got: frame.as_bytes().len(),
        })?;
        Ok(Self { volume })
    }
}

/// Capability response: packed feature bits after an 8-byte header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityResponse {
    pub packed: Vec<u8>,
}

impl DockResponse for CapabilityResponse {
    fn from_frame(frame: &ResponseFrame) -> Result<Self, ParseError> {
        let packed = frame.payload_after(CAPABILITY_HEADER_SIZE - HEADER_SIZE)?;
        Ok(Self {
            packed: packed.to_vec(),
        })
    }
}

/// Decode a name or firmware version response
pub fn decode_identity(raw: &[u8]) -> Result<String, ParseError> {
    TextResponse::parse(raw).map(|r| r.text)
}

/// Decode a volume response
pub fn decode_volume(raw: &[u8]) -> Result<u8, ParseError> {
    VolumeResponse::parse(raw).map(|r| r.volume)
}

/// Extract the packed capability bytes from a capability response
pub fn decode_capability_payload(raw: &[u8]) -> Result<Vec<u8>, ParseError> {
    CapabilityResponse::parse(raw).map(|r| r.packed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_frames() {
        let mut encoder = FrameEncoder::new();
        assert_eq!(QueryName::default().encode(&mut encoder), vec![153, 3, 1, 8, 248]);
        assert_eq!(
            QueryVersion::default().encode(&mut encoder),
            vec![153, 3, 2, 19, 237]
        );
        assert_eq!(QueryVolume.encode(&mut encoder), vec![153, 4, 3, 15, 0, 241]);
        assert_eq!(
            QueryCapabilities::default().encode(&mut encoder),
            vec![153, 3, 4, 6, 250]
        );
    }

    #[test]
    fn test_set_volume_bounds() {
        assert_eq!(SetVolume::new(32).unwrap().payload(), vec![0, 32]);
        assert_eq!(SetVolume::new(0).unwrap().payload(), vec![0, 0]);
        assert!(SetVolume::new(33).is_none());
    }

    #[test]
    fn test_set_alarm_led_payload() {
        assert_eq!(SetAlarmLed::new(true).payload(), vec![24, 1]);
        assert_eq!(SetAlarmLed::new(false).payload(), vec![24, 0]);
        assert_eq!(SetAlarmLed::CMD, cmd::SET);
    }

    #[test]
    fn test_set_datetime_fields() {
        let dt = SetDateTime::new(2024, 3, 5, 14, 5, 9);
        assert_eq!(dt.fields(), [20, 24, 2, 5, 14, 5, 9]);
        assert_eq!(dt.payload(), vec![8, 20, 24, 2, 5, 14, 5, 9]);
        assert_eq!(dt.display(), "2024-03-05 14:05:09");
    }

    #[test]
    fn test_set_datetime_century_boundary() {
        let dt = SetDateTime::new(2100, 1, 1, 0, 0, 0);
        assert_eq!(dt.fields(), [21, 0, 0, 1, 0, 0, 0]);
        assert_eq!(dt.display(), "2100-01-01 00:00:00");
    }

    #[test]
    fn test_decode_identity() {
        let raw = [153, 9, 1, 8, b'A', 0, b'S', b'1', b'1', b'1', 0x10];
        assert_eq!(decode_identity(&raw).unwrap(), "AS111");
    }

    #[test]
    fn test_decode_identity_latin1() {
        let raw = [153, 5, 1, 19, b'v', 0xE9, 0];
        assert_eq!(decode_identity(&raw).unwrap(), "v\u{e9}");
    }

    #[test]
    fn test_decode_identity_too_short() {
        for raw in [&[][..], &[153], &[153, 3, 1, 8]] {
            assert!(matches!(
                decode_identity(raw),
                Err(ParseError::TooShort { expected: 5, .. })
            ));
        }
    }

    #[test]
    fn test_decode_volume_second_to_last() {
        assert_eq!(decode_volume(&[153, 5, 3, 15, 0, 18, 0xDA]).unwrap(), 18);
        assert!(decode_volume(&[153, 3, 3, 15, 0]).is_err());
    }

    #[test]
    fn test_decode_capability_payload() {
        let raw = [153, 9, 4, 6, 0xAA, 0xBB, 0xCC, 0xDD, 0x01, 0x05, 0x77];
        assert_eq!(decode_capability_payload(&raw).unwrap(), vec![0x01, 0x05]);

        // Header only: empty capability bytes, not an error
        let raw = [153, 9, 4, 6, 0xAA, 0xBB, 0xCC, 0xDD, 0x77];
        assert!(decode_capability_payload(&raw).unwrap().is_empty());

        let raw = [153, 9, 4, 6, 0xAA, 0x77];
        assert!(decode_capability_payload(&raw).is_err());
    }

    #[test]
    fn test_parse_error_display() {
        let e = ParseError::TooShort {
            expected: 5,
            got: 0,
        };
        assert_eq!(
            e.to_string(),
            "Response too short: expected at least 5 bytes, got 0"
        );
    }
}

//! Accumulated dock state

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use as111_transport::SetDateTime;

use crate::capabilities::CapabilitySet;

/// Everything learned about (or written to) one dock during a session
///
/// Serializes with the field names the JSON output uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Device {
    mac: String,
    pub name: String,
    pub version: String,
    /// Last clock value written to the dock, empty until a time sync
    pub datetime: String,
    pub volume: u8,
    pub capabilities: CapabilitySet,
}

impl Device {
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            ..Self::default()
        }
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }
}

/// Multi-line summary in the `info` command layout
impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MAC:          {}", self.mac)?;
        writeln!(f, "Name:         {}", self.name)?;
        writeln!(f, "Version:      {}", self.version)?;
        writeln!(f, "Time:         {}", self.datetime)?;
        writeln!(f, "Volume:       {}", self.volume)?;
        if self.capabilities.is_empty() {
            write!(f, "Capabilities: -")
        } else {
            write!(f, "Capabilities: {}", self.capabilities.labels().join(", "))
        }
    }
}

/// Clock fields for a SET / DATETIME request
pub fn datetime_command(now: NaiveDateTime) -> SetDateTime {
    SetDateTime::new(
        now.year().clamp(0, 9999) as u16,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{decode_capabilities, Capability};
    use chrono::NaiveDate;

    #[test]
    fn test_datetime_command_mapping() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        let dt = datetime_command(now);
        assert_eq!(dt.fields(), [20, 24, 2, 5, 14, 5, 9]);
        assert_eq!(dt.display(), "2024-03-05 14:05:09");
    }

    #[test]
    fn test_december_is_eleven_on_the_wire() {
        let now = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let dt = datetime_command(now);
        assert_eq!(dt.fields(), [19, 99, 11, 31, 23, 59, 59]);
        assert_eq!(dt.display(), "1999-12-31 23:59:59");
    }

    #[test]
    fn test_json_shape() {
        let mut device = Device::new("00:1A:7D:DA:71:13");
        device.name = "AS111".into();
        device.volume = 12;
        device.capabilities = decode_capabilities(&[0b101]);

        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["mac"], "00:1A:7D:DA:71:13");
        assert_eq!(json["name"], "AS111");
        assert_eq!(json["datetime"], "");
        assert_eq!(json["volume"], 12);
        assert_eq!(
            json["capabilities"],
            serde_json::json!(["0-VOLUME", "2-DBB"])
        );
    }

    #[test]
    fn test_info_layout() {
        let mut device = Device::new("00:1A:7D:DA:71:13");
        device.capabilities.insert(Capability::DockAlarmLed);
        let text = device.to_string();
        assert!(text.starts_with("MAC:          00:1A:7D:DA:71:13\n"));
        assert!(text.ends_with("Capabilities: 24-DOCK_ALARM_LED"));
    }
}

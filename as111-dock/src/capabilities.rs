//! Dock capability table and bitmask decoding

use std::fmt;

use serde::{Serialize, Serializer};

/// Features a dock can advertise, in bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Capability {
    Volume = 0,
    Dsc = 1,
    Dbb = 2,
    Treble = 3,
    Bass = 4,
    Full = 5,
    Charging = 6,
    Battery = 7,
    DateTime = 8,
    Eq1 = 9,
    Eq2 = 10,
    Eq3 = 11,
    Eq4 = 12,
    Eq5 = 13,
    AlarmVolume = 14,
    AcDcPowerMode = 15,
    RemoteControl = 16,
    FmStationSearch = 17,
    FmFrequencyTuning = 18,
    FmAutoProgram = 19,
    FmManualProgram = 20,
    FmPresetStation = 21,
    DockAlarm1 = 22,
    DockAlarm2 = 23,
    DockAlarmLed = 24,
    AudioSource = 25,
    Appalm = 26,
    Rcappsc = 27,
}

impl Capability {
    /// The full table; position equals bit index
    pub const ALL: [Capability; 28] = [
        Capability::Volume,
        Capability::Dsc,
        Capability::Dbb,
        Capability::Treble,
        Capability::Bass,
        Capability::Full,
        Capability::Charging,
        Capability::Battery,
        Capability::DateTime,
        Capability::Eq1,
        Capability::Eq2,
        Capability::Eq3,
        Capability::Eq4,
        Capability::Eq5,
        Capability::AlarmVolume,
        Capability::AcDcPowerMode,
        Capability::RemoteControl,
        Capability::FmStationSearch,
        Capability::FmFrequencyTuning,
        Capability::FmAutoProgram,
        Capability::FmManualProgram,
        Capability::FmPresetStation,
        Capability::DockAlarm1,
        Capability::DockAlarm2,
        Capability::DockAlarmLed,
        Capability::AudioSource,
        Capability::Appalm,
        Capability::Rcappsc,
    ];

    /// Look up by bit index; `None` past the end of the table
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Protocol name, e.g. `DOCK_ALARM_LED`
    pub fn name(self) -> &'static str {
        match self {
            Capability::Volume => "VOLUME",
            Capability::Dsc => "DSC",
            Capability::Dbb => "DBB",
            Capability::Treble => "TREBLE",
            Capability::Bass => "BASS",
            Capability::Full => "FULL",
            Capability::Charging => "CHARGING",
            Capability::Battery => "BATTERY",
            Capability::DateTime => "DATETIME",
            Capability::Eq1 => "EQ1",
            Capability::Eq2 => "EQ2",
            Capability::Eq3 => "EQ3",
            Capability::Eq4 => "EQ4",
            Capability::Eq5 => "EQ5",
            Capability::AlarmVolume => "ALARM_VOLUME",
            Capability::AcDcPowerMode => "AC_DC_POWER_MODE",
            Capability::RemoteControl => "REMOTE_CONTROL",
            Capability::FmStationSearch => "FM_STATION_SEARCH",
            Capability::FmFrequencyTuning => "FM_FREQUENCY_TUNING",
            Capability::FmAutoProgram => "FM_AUTO_PROGRAM",
            Capability::FmManualProgram => "FM_MANUAL_PROGRAM",
            Capability::FmPresetStation => "FM_PRESET_STATION",
            Capability::DockAlarm1 => "DOCK_ALARM_1",
            Capability::DockAlarm2 => "DOCK_ALARM_2",
            Capability::DockAlarmLed => "DOCK_ALARM_LED",
            Capability::AudioSource => "AUDIO_SOURCE",
            Capability::Appalm => "APPALM",
            Capability::Rcappsc => "RCAPPSC",
        }
    }
}

/// Displays as `"<index>-<NAME>"`, e.g. `2-DBB`
impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.index(), self.name())
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Set of supported capabilities, iterated in table order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, capability: Capability) {
        self.bits |= 1 << capability.index();
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.bits & (1 << capability.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Labels as shown to users, e.g. `["0-VOLUME", "2-DBB"]`
    pub fn labels(&self) -> Vec<String> {
        self.iter().map(|c| c.to_string()).collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = Self::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(self.iter())
    }
}

/// Decode packed capability bytes as received from the dock
///
/// The last byte on the wire carries bits 0-7, the one before it bits 8-15,
/// and so on; within a byte the least significant bit comes first. Bits past
/// the end of the capability table are ignored.
pub fn decode_capabilities(packed: &[u8]) -> CapabilitySet {
    let mut set = CapabilitySet::new();
    for (i, &byte) in packed.iter().rev().enumerate() {
        for bit in 0..8 {
            if (byte >> bit) & 1 == 1 {
                if let Some(capability) = Capability::from_index(i * 8 + bit) {
                    set.insert(capability);
                }
            }
        }
    }
    set
}

//! High-level session interface for AS111 Bluetooth audio docks
//!
//! A [`DockSession`] owns the link to one dock, the request sequence counter
//! and the [`Device`] state gathered from it. Every operation is one
//! request/response round trip; nothing runs in the background.
//!
//! ```ignore
//! let mut session = DockSession::new(address, SessionOptions::default());
//! session.connect()?;
//! session.refresh_device_info()?;
//! session.set_volume(12)?;
//! session.disconnect();
//! ```

pub mod capabilities;
pub mod device;
pub mod error;

pub use capabilities::{decode_capabilities, Capability, CapabilitySet};
pub use device::{datetime_command, Device};
pub use error::DockError;

use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use as111_transport::protocol::{rfcomm, timing, MAX_VOLUME};
use as111_transport::{
    BdAddr, BoxedTransport, CapabilityResponse, DockCommand, DockResponse, FrameEncoder,
    ParseError, PrinterConfig, PrinterTransport, QueryCapabilities, QueryName, QueryVersion,
    QueryVolume, ResponseFrame, RfcommTransport, SetAlarmLed, SetVolume, TextResponse,
    VolumeResponse,
};

/// Per-session settings
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// RFCOMM channel to connect to
    pub channel: u8,
    /// How long to wait for each response
    pub timeout: Duration,
    /// Reject responses whose checksum does not add up
    pub validate_checksum: bool,
    /// Log all traffic through a `PrinterTransport`
    pub printer: Option<PrinterConfig>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            channel: rfcomm::DEFAULT_CHANNEL,
            timeout: Duration::from_millis(timing::RESPONSE_TIMEOUT_MS),
            validate_checksum: false,
            printer: None,
        }
    }
}

/// One connection to one dock
pub struct DockSession {
    address: BdAddr,
    options: SessionOptions,
    transport: Option<BoxedTransport>,
    encoder: FrameEncoder,
    device: Device,
}

impl DockSession {
    /// Create a session; nothing is opened until [`connect`](Self::connect)
    pub fn new(address: BdAddr, options: SessionOptions) -> Self {
        Self {
            address,
            options,
            transport: None,
            encoder: FrameEncoder::new(),
            device: Device::new(address.to_string()),
        }
    }

    /// Show the address as the caller wrote it instead of the normalized
    /// upper-case form
    pub fn with_mac_label(mut self, mac: impl Into<String>) -> Self {
        self.device = Device::new(mac);
        self
    }

    pub fn address(&self) -> BdAddr {
        self.address
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// State gathered so far
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Sequence number of the last request sent (0 before the first)
    pub fn sequence(&self) -> u8 {
        self.encoder.sequence()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    // === Lifecycle ===

    /// Open the RFCOMM link
    pub fn connect(&mut self) -> Result<(), DockError> {
        let transport = RfcommTransport::connect(self.address, self.options.channel)
            .map_err(DockError::Connection)?;
        self.attach(Box::new(transport));
        Ok(())
    }

    /// Use an already open transport instead of connecting
    pub fn attach(&mut self, transport: BoxedTransport) {
        let transport: BoxedTransport = match &self.options.printer {
            Some(config) => Box::new(PrinterTransport::wrap(transport, config.clone())),
            None => transport,
        };
        self.transport = Some(transport);
    }

    /// Close the link; close errors are logged and otherwise ignored
    pub fn disconnect(&mut self) {
        debug!("disconnect");
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close() {
                debug!("close failed: {}", e);
            }
        }
        debug!("disconnected");
    }

    // === Exchange ===

    /// Send one request and read its response
    fn exchange<C: DockCommand>(&mut self, command: &C) -> Result<Vec<u8>, DockError> {
        let transport = self.transport.as_mut().ok_or(DockError::NotConnected)?;
        let frame = command.encode(&mut self.encoder);
        transport.send(&frame)?;
        Ok(transport.receive(self.options.timeout)?)
    }

    /// Send one request and parse the response
    fn query<C: DockCommand, R: DockResponse>(&mut self, command: &C) -> Result<R, DockError> {
        let raw = self.exchange(command)?;
        let frame = ResponseFrame::parse(&raw)?;
        if self.options.validate_checksum && !frame.checksum_valid() {
            return Err(ParseError::ChecksumMismatch {
                command: frame.command(),
                checksum: frame.checksum(),
            }
            .into());
        }
        Ok(R::from_frame(&frame)?)
    }

    // === Queries ===

    /// Read the dock's name
    pub fn query_identity(&mut self) -> Result<&str, DockError> {
        debug!("request device name");
        let resp: TextResponse = self.query(&QueryName::default())?;
        self.device.name = resp.text;
        debug!("device name is \"{}\"", self.device.name);
        Ok(&self.device.name)
    }

    /// Read the firmware version string
    pub fn query_version(&mut self) -> Result<&str, DockError> {
        debug!("request device version");
        let resp: TextResponse = self.query(&QueryVersion::default())?;
        self.device.version = resp.text;
        debug!("device version is \"{}\"", self.device.version);
        Ok(&self.device.version)
    }

    /// Read the current volume
    pub fn query_volume(&mut self) -> Result<u8, DockError> {
        debug!("request current volume");
        let resp: VolumeResponse = self.query(&QueryVolume)?;
        self.device.volume = resp.volume;
        debug!("current volume is {}", resp.volume);
        Ok(resp.volume)
    }

    /// Read the supported feature set
    ///
    /// The stored set is replaced only when the whole response decodes.
    pub fn query_capabilities(&mut self) -> Result<CapabilitySet, DockError> {
        debug!("request device capabilities");
        let resp: CapabilityResponse = self.query(&QueryCapabilities::default())?;
        let capabilities = decode_capabilities(&resp.packed);
        self.device.capabilities = capabilities;
        debug!("device capabilities: {:?}", capabilities.labels());
        Ok(capabilities)
    }

    /// Run the identity, version, volume and capability queries in order
    ///
    /// A query that fails leaves its field untouched and the refresh moves on.
    /// Errors that make further queries pointless stop the refresh and are
    /// returned.
    pub fn refresh_device_info(&mut self) -> Result<(), DockError> {
        let steps: [(&str, fn(&mut Self) -> Result<(), DockError>); 4] = [
            ("name", |s| s.query_identity().map(|_| ())),
            ("version", |s| s.query_version().map(|_| ())),
            ("volume", |s| s.query_volume().map(|_| ())),
            ("capabilities", |s| s.query_capabilities().map(|_| ())),
        ];
        for (what, step) in steps {
            match step(self) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => warn!("could not read {}: {}", what, e),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // === Commands ===

    /// Write the clock; the dock's reply is read and discarded
    pub fn sync_time(&mut self, now: NaiveDateTime) -> Result<&str, DockError> {
        let command = datetime_command(now);
        let shown = command.display();
        debug!("sync time to {}", shown);
        self.exchange(&command)?;
        self.device.datetime = shown;
        debug!("time synced");
        Ok(&self.device.datetime)
    }

    /// Set the volume (0-32)
    pub fn set_volume(&mut self, volume: u8) -> Result<(), DockError> {
        let command = SetVolume::new(volume).ok_or_else(|| {
            DockError::InvalidParameter(format!("Volume must be between 0 and {MAX_VOLUME}"))
        })?;
        debug!("set volume to {}", volume);
        self.exchange(&command)?;
        self.device.volume = volume;
        debug!("volume set to {}", volume);
        Ok(())
    }

    /// Switch the alarm LED on or off
    pub fn set_alarm_led(&mut self, on: bool) -> Result<(), DockError> {
        debug!("set alarm led {}", if on { "on" } else { "off" });
        self.exchange(&SetAlarmLed::new(on))?;
        debug!("alarm led set");
        Ok(())
    }
}

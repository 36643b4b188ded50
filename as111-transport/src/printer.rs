//! PrinterTransport middleware for monitoring transport operations
//!
//! Wraps any `Transport` and logs every frame passing through it, in the
//! `>>>` (to dock) / `<<<` (from dock) style used by the diagnostic mode.
//!
//! # Example
//!
//! ```ignore
//! use as111_transport::{PrinterConfig, PrinterTransport, RfcommTransport};
//!
//! let transport = RfcommTransport::connect(address, 1)?;
//! let monitored = PrinterTransport::wrap(Box::new(transport), PrinterConfig::default());
//! // Now all requests/responses are logged at debug level
//! ```

use std::time::Duration;

use tracing::{debug, warn};

use crate::protocol::{self, cmd, set_op};
use crate::{BoxedTransport, Transport, TransportDeviceInfo, TransportError};

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Show bytes as hex instead of decimal
    pub show_hex: bool,
}

/// Transport wrapper that logs all traffic
pub struct PrinterTransport {
    inner: BoxedTransport,
    config: PrinterConfig,
}

impl PrinterTransport {
    pub fn wrap(inner: BoxedTransport, config: PrinterConfig) -> Self {
        Self { inner, config }
    }

    /// Short description of a request frame: command name plus SET sub-op
    fn describe(frame: &[u8]) -> String {
        match (frame.get(3), frame.get(4)) {
            (Some(&cmd::SET), Some(&op)) => format!("SET/{}", set_op::name(op)),
            (Some(&c), _) => cmd::name(c).to_string(),
            _ => "?".to_string(),
        }
    }
}

impl Transport for PrinterTransport {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        debug!(
            ">>> {} [{}]",
            protocol::format_bytes(frame, self.config.show_hex),
            Self::describe(frame)
        );
        self.inner.send(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        match self.inner.receive(timeout) {
            Ok(data) => {
                debug!("<<< {}", protocol::format_bytes(&data, self.config.show_hex));
                Ok(data)
            }
            Err(e) => {
                warn!("request failed, {}", e);
                Err(e)
            }
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        debug!("closing {}", self.inner.device_info().address);
        self.inner.close()
    }
}

//! Bluetooth RFCOMM transport
//!
//! The dock exposes a serial-port-emulating RFCOMM channel. On Linux the
//! socket is opened through BlueZ's `AF_BLUETOOTH` family; the kernel does
//! the pairing and link management, we only see a byte stream.
//!
//! Each `receive` call performs a single read of up to 255 bytes, bounded by
//! `SO_RCVTIMEO`. Responses are assumed to arrive in one read.

use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
#[cfg(target_os = "linux")]
use crate::protocol::MAX_RESPONSE_SIZE;
use crate::types::{BdAddr, TransportDeviceInfo};
use crate::Transport;

/// RFCOMM stream connection to one dock
pub struct RfcommTransport {
    #[cfg(target_os = "linux")]
    socket: std::fs::File,
    info: TransportDeviceInfo,
    receive_timeout: Option<Duration>,
}

impl RfcommTransport {
    /// Connect to `address` on `channel`
    #[cfg(target_os = "linux")]
    pub fn connect(address: BdAddr, channel: u8) -> Result<Self, TransportError> {
        debug!("Connecting RFCOMM {} channel {}", address, channel);
        let socket = sys::connect(address, channel).map_err(|e| TransportError::ConnectFailed {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        debug!("Connected to {}", address);
        Ok(Self {
            socket,
            info: TransportDeviceInfo::rfcomm(address, channel),
            receive_timeout: None,
        })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn connect(address: BdAddr, channel: u8) -> Result<Self, TransportError> {
        debug!("RFCOMM unavailable, cannot connect {} channel {}", address, channel);
        Err(TransportError::Unsupported)
    }
}

#[cfg(target_os = "linux")]
impl Transport for RfcommTransport {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        use std::io::Write;

        self.socket.write_all(frame)?;
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        use std::io::Read;

        if self.receive_timeout != Some(timeout) {
            sys::set_receive_timeout(&self.socket, timeout)?;
            self.receive_timeout = Some(timeout);
        }

        let mut buf = vec![0u8; MAX_RESPONSE_SIZE];
        let n = self
            .socket
            .read(&mut buf)
            .map_err(TransportError::from_receive)?;
        if n == 0 {
            return Err(TransportError::Disconnected);
        }
        buf.truncate(n);
        Ok(buf)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn close(&mut self) -> Result<(), TransportError> {
        sys::shutdown(&self.socket)?;
        Ok(())
    }
}

#[cfg(not(target_os = "linux"))]
impl Transport for RfcommTransport {
    fn send(&mut self, _frame: &[u8]) -> Result<(), TransportError> {
        Err(TransportError::Unsupported)
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::Unsupported)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(target_os = "linux")]
mod sys {
    use std::io;
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
    use std::time::Duration;

    use crate::types::BdAddr;

    /// BlueZ `BTPROTO_RFCOMM`
    const BTPROTO_RFCOMM: libc::c_int = 3;

    /// BlueZ `struct sockaddr_rc`
    #[repr(C)]
    struct SockaddrRc {
        rc_family: libc::sa_family_t,
        rc_bdaddr: [u8; 6],
        rc_channel: u8,
    }

    pub fn connect(address: BdAddr, channel: u8) -> io::Result<std::fs::File> {
        let fd = unsafe {
            libc::socket(
                libc::AF_BLUETOOTH,
                libc::SOCK_STREAM | libc::SOCK_CLOEXEC,
                BTPROTO_RFCOMM,
            )
        };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        // Owned from here on so early returns close the socket
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        let addr = SockaddrRc {
            rc_family: libc::AF_BLUETOOTH as libc::sa_family_t,
            rc_bdaddr: address.to_le_bytes(),
            rc_channel: channel,
        };
        let ret = unsafe {
            libc::connect(
                fd.as_raw_fd(),
                &addr as *const SockaddrRc as *const libc::sockaddr,
                std::mem::size_of::<SockaddrRc>() as libc::socklen_t,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(std::fs::File::from(fd))
    }

    pub fn set_receive_timeout(socket: &std::fs::File, timeout: Duration) -> io::Result<()> {
        // A zero timeval means "block forever"
        let timeout = timeout.max(Duration::from_millis(1));
        let tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        let ret = unsafe {
            libc::setsockopt(
                socket.as_raw_fd(),
                libc::SOL_SOCKET,
                libc::SO_RCVTIMEO,
                &tv as *const libc::timeval as *const libc::c_void,
                std::mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn shutdown(socket: &std::fs::File) -> io::Result<()> {
        let ret = unsafe { libc::shutdown(socket.as_raw_fd(), libc::SHUT_RDWR) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

//! In-memory transport
//!
//! Replays a queue of canned responses and records every frame sent. Used to
//! drive a session without a dock, e.g. in tests or when replaying a capture.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::types::{BdAddr, TransportDeviceInfo, TransportType};
use crate::Transport;

/// What the next `receive` call yields
#[derive(Debug)]
pub enum Reply {
    Bytes(Vec<u8>),
    Timeout,
    Disconnected,
}

/// Scripted transport with a shared log of sent frames
pub struct MemoryTransport {
    info: TransportDeviceInfo,
    replies: VecDeque<Reply>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    closed: bool,
}

impl MemoryTransport {
    pub fn new(address: BdAddr) -> Self {
        Self {
            info: TransportDeviceInfo {
                address,
                channel: 0,
                transport_type: TransportType::Memory,
            },
            replies: VecDeque::new(),
            sent: Arc::new(Mutex::new(Vec::new())),
            closed: false,
        }
    }

    /// Queue a response
    pub fn reply(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.replies.push_back(Reply::Bytes(bytes.into()));
        self
    }

    /// Queue a receive timeout
    pub fn timeout(mut self) -> Self {
        self.replies.push_back(Reply::Timeout);
        self
    }

    /// Queue a dropped link
    pub fn disconnect(mut self) -> Self {
        self.replies.push_back(Reply::Disconnected);
        self
    }

    /// Handle on the frames sent so far; stays valid after the transport
    /// is boxed and handed to a session.
    pub fn sent_log(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.sent)
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Disconnected);
        }
        self.sent.lock().push(frame.to_vec());
        Ok(())
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Vec<u8>, TransportError> {
        if self.closed {
            return Err(TransportError::Disconnected);
        }
        // An exhausted script behaves like a silent dock
        match self.replies.pop_front() {
            Some(Reply::Bytes(bytes)) => Ok(bytes),
            Some(Reply::Disconnected) => Err(TransportError::Disconnected),
            Some(Reply::Timeout) | None => Err(TransportError::Timeout),
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Disconnected);
        }
        self.closed = true;
        Ok(())
    }
}

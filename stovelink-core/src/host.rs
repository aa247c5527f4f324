//! Host side of the bridge
//!
//! Wraps the host link. Outbound frames are fire and forget: a failed
//! write is counted and its error kept for the firmware to log, never
//! passed up the call chain.

use stovelink_hal::{Uart, UartTx};
use stovelink_protocol::{OutboundFrame, INBOUND_FRAME_LEN};

/// Host link with write error accounting
pub struct HostPort<H: Uart> {
    link: H,
    write_errors: u32,
    last_error: Option<<H as UartTx>::Error>,
}

impl<H: Uart> HostPort<H> {
    pub fn new(link: H) -> Self {
        Self {
            link,
            write_errors: 0,
            last_error: None,
        }
    }

    /// Send one frame
    pub fn send(&mut self, frame: impl Into<OutboundFrame>) {
        let bytes = frame.into().encode();
        if let Err(e) = self.link.write_blocking(&bytes) {
            self.write_errors = self.write_errors.wrapping_add(1);
            self.last_error = Some(e);
        }
    }

    /// Bytes waiting to be read; a failing link reads as empty
    pub fn pending(&mut self) -> usize {
        self.link.available().unwrap_or(0)
    }

    /// Read one inbound frame's worth of bytes
    ///
    /// `None` if fewer than four bytes arrived before the timeout; those
    /// bytes are lost.
    pub fn read_frame(&mut self) -> Option<[u8; INBOUND_FRAME_LEN]> {
        let mut buf = [0u8; INBOUND_FRAME_LEN];
        match self.link.read_blocking(&mut buf) {
            Ok(INBOUND_FRAME_LEN) => Some(buf),
            _ => None,
        }
    }

    /// Drop everything pending, returning how many bytes went
    pub fn discard_pending(&mut self) -> usize {
        self.link.discard_pending().unwrap_or(0)
    }

    /// Writes that failed since start-up
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    /// Error of the most recent failed write, cleared on read
    pub fn take_error(&mut self) -> Option<<H as UartTx>::Error> {
        self.last_error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{LinkDown, MockHost};
    use stovelink_protocol::{AckCode, AckNak};

    fn ack() -> AckNak {
        AckNak {
            device_id: 0,
            code: AckCode::Ack,
            command_type: 1,
        }
    }

    #[test]
    fn test_send_encodes_frame() {
        let mock = MockHost::new();
        let mut host = HostPort::new(mock.clone());
        host.send(ack());
        assert_eq!(mock.take_frames(), [[0x00, 0xFD, 0x01, 0x00, 0xFE]]);
        assert_eq!(host.write_errors(), 0);
    }

    #[test]
    fn test_write_errors_are_counted() {
        let mock = MockHost::new();
        mock.fail_writes(true);
        let mut host = HostPort::new(mock.clone());
        host.send(ack());
        host.send(ack());

        assert_eq!(host.write_errors(), 2);
        assert_eq!(host.take_error(), Some(LinkDown));
        assert_eq!(host.take_error(), None);
    }

    #[test]
    fn test_read_frame() {
        let mock = MockHost::new();
        let mut host = HostPort::new(mock.clone());
        mock.send(&[0x00, 0x01, 0x01, 0x02, 0x07]);

        assert_eq!(host.pending(), 5);
        assert_eq!(host.read_frame(), Some([0x00, 0x01, 0x01, 0x02]));
        // One byte left, not a frame
        assert_eq!(host.read_frame(), None);
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn test_discard_pending() {
        let mock = MockHost::new();
        let mut host = HostPort::new(mock.clone());
        mock.send(&[1, 2, 3]);
        assert_eq!(host.discard_pending(), 3);
        assert_eq!(mock.unread(), 0);
    }
}

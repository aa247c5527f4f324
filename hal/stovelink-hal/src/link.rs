//! Timed serial link over an `embedded-io` byte stream
//!
//! Chip HALs hand out buffered UARTs that implement `embedded-io`'s
//! `Read`, `ReadReady` and `Write`. Those reads block forever; the bridge
//! needs reads that give up after a quiet period and a count of pending
//! bytes. [`IoLink`] adds both on top of any such stream.

use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;

use crate::time::Clock;
use crate::uart::{UartRx, UartTx};

/// Default number of bytes staged ahead of a read
pub const DEFAULT_STAGING: usize = 32;

/// Serial link with an inter-byte read timeout
///
/// Bytes pulled off the stream to answer [`UartRx::available`] are kept in
/// a small staging buffer and handed out first by the next read.
pub struct IoLink<T, C, const N: usize = DEFAULT_STAGING> {
    io: T,
    clock: C,
    timeout_us: u64,
    staged: Vec<u8, N>,
}

impl<T, C, const N: usize> IoLink<T, C, N> {
    /// Wrap a stream; a read gives up after `timeout_ms` without a new byte
    pub fn new(io: T, clock: C, timeout_ms: u32) -> Self {
        Self {
            io,
            clock,
            timeout_us: u64::from(timeout_ms) * 1000,
            staged: Vec::new(),
        }
    }

    /// Read timeout in milliseconds
    pub fn timeout_ms(&self) -> u32 {
        (self.timeout_us / 1000) as u32
    }

    /// Release the stream and clock
    pub fn into_inner(self) -> (T, C) {
        (self.io, self.clock)
    }

    /// Drop the first `count` staged bytes
    fn consume_staged(&mut self, count: usize) {
        let remaining = self.staged.len() - count;
        self.staged.copy_within(count.., 0);
        self.staged.truncate(remaining);
    }
}

impl<T: Read + ReadReady, C, const N: usize> IoLink<T, C, N> {
    /// Move whatever the stream has ready into the staging buffer
    fn stage(&mut self) -> Result<(), T::Error> {
        let mut chunk = [0u8; 8];
        while !self.staged.is_full() && self.io.read_ready()? {
            let room = (N - self.staged.len()).min(chunk.len());
            let read = self.io.read(&mut chunk[..room])?;
            if read == 0 {
                break;
            }
            // Cannot overflow, `room` bounds the read
            let _ = self.staged.extend_from_slice(&chunk[..read]);
        }
        Ok(())
    }
}

impl<T, C, const N: usize> UartRx for IoLink<T, C, N>
where
    T: Read + ReadReady,
    C: Clock,
{
    type Error = T::Error;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        let mut last_byte_at = self.clock.now_us();

        while filled < buf.len() {
            self.stage()?;

            if self.staged.is_empty() {
                if self.clock.elapsed_us(last_byte_at) >= self.timeout_us {
                    break;
                }
                continue;
            }

            let take = self.staged.len().min(buf.len() - filled);
            buf[filled..filled + take].copy_from_slice(&self.staged[..take]);
            self.consume_staged(take);
            filled += take;
            last_byte_at = self.clock.now_us();
        }

        Ok(filled)
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        self.stage()?;
        Ok(self.staged.len())
    }
}

impl<T: Write, C, const N: usize> UartTx for IoLink<T, C, N> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.io.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.io.flush()
    }
}

//! UART serial communication abstractions
//!
//! Provides blocking traits for serial communication that can be
//! implemented by chip-specific HALs.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Block until every queued byte has left the wire
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read data from the UART
    ///
    /// Blocks until the buffer is filled or the read timeout expires, and
    /// returns the number of bytes actually read. A short count is not an
    /// error.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Number of received bytes that can be read without blocking
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Read a single byte, `None` on timeout
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read_blocking(&mut buf)? {
            1 => Ok(Some(buf[0])),
            _ => Ok(None),
        }
    }

    /// Throw away everything currently pending, returning how much was dropped
    fn discard_pending(&mut self) -> Result<usize, Self::Error> {
        let mut dropped = 0;
        let mut scratch = [0u8; 16];
        loop {
            let pending = self.available()?;
            if pending == 0 {
                return Ok(dropped);
            }
            let chunk = pending.min(scratch.len());
            let read = self.read_blocking(&mut scratch[..chunk])?;
            dropped += read;
            if read < chunk {
                return Ok(dropped);
            }
        }
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Separate RX/TX wires or one shared wire
    pub duplex: Duplex,
}

impl UartConfig {
    /// 8N1 on separate wires
    pub const fn full_duplex(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            duplex: Duplex::Full,
        }
    }

    /// 8N1 on a single shared wire
    pub const fn single_wire(baudrate: u32) -> Self {
        Self {
            duplex: Duplex::Half,
            ..Self::full_duplex(baudrate)
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::full_duplex(115200)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// Wiring of the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Separate RX and TX lines
    Full,
    /// One line, transmitter and receiver take turns
    Half,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Pending(VecDeque<u8>);

    impl UartRx for Pending {
        type Error = ();

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let mut count = 0;
            for slot in buf.iter_mut() {
                match self.0.pop_front() {
                    Some(byte) => {
                        *slot = byte;
                        count += 1;
                    }
                    None => break,
                }
            }
            Ok(count)
        }

        fn available(&mut self) -> Result<usize, ()> {
            Ok(self.0.len())
        }
    }

    #[test]
    fn test_read_byte_timeout() {
        let mut rx = Pending(VecDeque::from([0x42]));
        assert_eq!(rx.read_byte(), Ok(Some(0x42)));
        assert_eq!(rx.read_byte(), Ok(None));
    }

    #[test]
    fn test_discard_pending_drains_everything() {
        let mut rx = Pending((0..40u8).collect());
        assert_eq!(rx.discard_pending(), Ok(40));
        assert_eq!(rx.available(), Ok(0));
        assert_eq!(rx.discard_pending(), Ok(0));
    }

    #[test]
    fn test_single_wire_config() {
        let config = UartConfig::single_wire(1200);
        assert_eq!(config.baudrate, 1200);
        assert_eq!(config.duplex, Duplex::Half);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(UartConfig::default().duplex, Duplex::Full);
    }
}

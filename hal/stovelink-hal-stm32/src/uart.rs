//! USART glue for STM32
//!
//! Converts link configuration to embassy-stm32 settings, maps bus errors
//! and wraps buffered USARTs into timed links.

use embassy_stm32::usart::{self, BufferedUart, Error as UsartError};
use stovelink_hal::uart::{DataBits, Parity, StopBits, UartConfig};
use stovelink_hal::IoLink;

use crate::time::EmbassyClock;

/// Link to one heater service port
pub type HeaterLink = IoLink<BufferedUart<'static>, EmbassyClock>;

/// Link to the host; a deeper staging buffer holds several queued frames
pub type HostLink = IoLink<BufferedUart<'static>, EmbassyClock, 64>;

/// Wrap a buffered USART as a heater link
pub fn heater_link(uart: BufferedUart<'static>, timeout_ms: u32) -> HeaterLink {
    IoLink::new(uart, EmbassyClock, timeout_ms)
}

/// Wrap a buffered USART as the host link
pub fn host_link(uart: BufferedUart<'static>, timeout_ms: u32) -> HostLink {
    IoLink::new(uart, EmbassyClock, timeout_ms)
}

/// Translate a link configuration into embassy-stm32 settings
///
/// Single-wire mode is chosen by the constructor
/// (`BufferedUart::new_half_duplex`), not by the config.
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut usart_config = usart::Config::default();
    usart_config.baudrate = config.baudrate;
    usart_config.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    usart_config.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    usart_config.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    usart_config
}

/// Error from UART operations
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

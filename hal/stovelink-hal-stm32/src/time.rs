//! Clock backed by the embassy time driver

use embassy_time::Instant;
use stovelink_hal::Clock;

/// Monotonic clock reading the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

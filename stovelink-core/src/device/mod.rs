//! Heater devices behind the bridge
//!
//! A [`Heater`] owns the link to one heater's service port, the static
//! profile of its model and the cache of its last responses.

pub mod cache;
pub mod table;
pub mod write;

pub use cache::{RawResponse, ResponseCache};
pub use table::{
    profile, DeviceProfile, RegisterCommand, Transform, Turnaround, HEATER_1, HEATER_2,
    MAX_PROBES,
};
pub use write::WriteCommand;

use stovelink_hal::Uart;
use stovelink_protocol::DeviceId;

use crate::poller::ReadFailure;

/// Result of a register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteResult {
    /// Heater echoed the expected acknowledgement
    Acknowledged,
    /// Heater answered with something else
    Rejected { response: [u8; 2] },
    /// Fewer than two bytes came back
    NoResponse,
}

/// One heater and its link
pub struct Heater<L> {
    profile: &'static DeviceProfile,
    link: L,
    cache: ResponseCache,
}

impl<L> Heater<L> {
    pub fn new(device: DeviceId, link: L) -> Self {
        Self {
            profile: profile(device),
            link,
            cache: ResponseCache::new(),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.profile.id
    }

    pub fn profile(&self) -> &'static DeviceProfile {
        self.profile
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub(crate) fn cache_mut(&mut self) -> &mut ResponseCache {
        &mut self.cache
    }

    pub(crate) fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}

impl<L: Uart> Heater<L> {
    /// Put bytes on the wire the way this model needs them
    pub(crate) fn transmit(&mut self, bytes: &[u8]) -> Result<(), ReadFailure> {
        match self.profile.turnaround {
            Turnaround::PerByte => {
                for byte in bytes {
                    self.link
                        .write_blocking(core::slice::from_ref(byte))
                        .map_err(|_| ReadFailure::Link)?;
                    self.link.flush().map_err(|_| ReadFailure::Link)?;
                }
            }
            Turnaround::Block => {
                self.link
                    .write_blocking(bytes)
                    .map_err(|_| ReadFailure::Link)?;
                self.link.flush().map_err(|_| ReadFailure::Link)?;
            }
        }
        Ok(())
    }

    /// Send a write and verify the acknowledgement
    ///
    /// An acknowledged write refreshes the affected cache entry. Nothing is
    /// retried.
    pub fn execute(&mut self, write: &WriteCommand) -> WriteResult {
        if self.transmit(&write.bytes).is_err() {
            return WriteResult::NoResponse;
        }

        let mut response = [0u8; 2];
        match self.link.read_blocking(&mut response) {
            Ok(2) => {}
            _ => return WriteResult::NoResponse,
        }

        if response != write.expected {
            return WriteResult::Rejected { response };
        }

        self.cache.set_value1(write.probe, write.cached_value);
        WriteResult::Acknowledged
    }
}

//! Last observed raw response per probe

use super::table::MAX_PROBES;

/// Raw 4-byte response as read from the heater
///
/// Single-register probes leave the last two bytes at zero.
pub type RawResponse = [u8; 4];

/// Per-device cache of raw responses, indexed by probe position
///
/// Starts zero-filled. Whether an entry holds real data is tracked by the
/// cycle state (first pass complete), not by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseCache {
    entries: [RawResponse; MAX_PROBES],
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    pub const fn new() -> Self {
        Self {
            entries: [[0; 4]; MAX_PROBES],
        }
    }

    /// Cached response of a probe
    pub fn get(&self, index: usize) -> Option<&RawResponse> {
        self.entries.get(index)
    }

    /// True if `raw` differs from what is cached for the probe
    pub fn differs(&self, index: usize, raw: &RawResponse) -> bool {
        self.get(index) != Some(raw)
    }

    /// Replace the cached response after a successful read
    pub fn store(&mut self, index: usize, raw: RawResponse) {
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = raw;
        }
    }

    /// Overwrite value byte 1 of a cached response
    ///
    /// Used after an acknowledged write so the next poll does not report a
    /// value the host just set.
    pub fn set_value1(&mut self, index: usize, value: u8) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry[1] = value;
        }
    }
}

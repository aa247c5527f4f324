//! Device poller
//!
//! Runs the probe at the cursor position against one heater, decides
//! whether the result is worth a status update and refreshes the cache.

use stovelink_hal::Uart;
use stovelink_protocol::StatusUpdate;

use crate::device::{Heater, RawResponse, RegisterCommand};
use crate::scheduler::CycleState;

/// Why a probe produced no usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadFailure {
    /// Fewer bytes than the probe returns arrived before the timeout
    ShortRead { expected: u8, received: u8 },
    /// The link reported an error
    Link,
}

/// Result of polling one heater at one cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// The heater has no probe at this position
    Idle,
    /// Read failed; nothing reported, cache untouched
    Skipped(ReadFailure),
    /// Read succeeded, nothing to report
    Unchanged,
    /// Read succeeded and should be reported to the host
    Report(StatusUpdate),
    /// Response matches no known pattern; reported with `value1 = raw[1]`
    Unrecognized {
        update: StatusUpdate,
        raw: RawResponse,
    },
}

impl PollOutcome {
    /// Status update this outcome puts on the host link
    pub fn update(&self) -> Option<StatusUpdate> {
        match *self {
            PollOutcome::Report(update) | PollOutcome::Unrecognized { update, .. } => Some(update),
            _ => None,
        }
    }
}

impl<L: Uart> Heater<L> {
    /// Poll the probe at `position`
    pub fn poll(&mut self, position: usize, cycle: &CycleState) -> PollOutcome {
        let Some(probe) = self.profile().probe(position) else {
            return PollOutcome::Idle;
        };

        let raw = match self.read_probe(probe) {
            Ok(raw) => raw,
            Err(failure) => return PollOutcome::Skipped(failure),
        };

        let changed = self.cache().differs(position, &raw);
        self.cache_mut().store(position, raw);

        if !cycle.should_report(changed) {
            return PollOutcome::Unchanged;
        }

        let mut update = StatusUpdate {
            device: self.id(),
            value_type: probe.value_type,
            value1: raw[1],
            value2: raw[3],
        };
        match probe.transform.apply(&raw) {
            Some(value1) => {
                update.value1 = value1;
                PollOutcome::Report(update)
            }
            None => PollOutcome::Unrecognized { update, raw },
        }
    }

    /// Read one or both registers of a probe
    ///
    /// The second register is queried even if the first read came up
    /// short; only the total count decides success.
    fn read_probe(&mut self, probe: &RegisterCommand) -> Result<RawResponse, ReadFailure> {
        let mut raw = [0u8; 4];

        self.transmit(&probe.first_address)?;
        let mut received = self
            .link_mut()
            .read_blocking(&mut raw[..2])
            .map_err(|_| ReadFailure::Link)?;

        if probe.read_second {
            self.transmit(&probe.second_address)?;
            received += self
                .link_mut()
                .read_blocking(&mut raw[2..])
                .map_err(|_| ReadFailure::Link)?;
        }

        let expected = probe.response_len();
        if received != expected {
            return Err(ReadFailure::ShortRead {
                expected: expected as u8,
                received: received as u8,
            });
        }

        Ok(raw)
    }
}

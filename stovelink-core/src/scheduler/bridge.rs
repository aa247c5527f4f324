//! Top-level bridge loop
//!
//! One [`Bridge::tick`] is one cursor step. The caller owns the pacing
//! between ticks (step delay, or the cycle pause after a wrap) so the
//! firmware can await it instead of blocking.

use embedded_hal::delay::DelayNs;
use stovelink_hal::{Uart, UartTx};
use stovelink_protocol::{DeviceId, StatusUpdate};

use super::cycle::{CycleState, Rollover};
use crate::command::{CommandLog, CommandProcessor};
use crate::config::BridgeConfig;
use crate::device::{Heater, MAX_PROBES};
use crate::fuel::FuelReporter;
use crate::host::HostPort;
use crate::poller::PollOutcome;
use crate::traits::RangeSensor;

/// Everything that happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Cursor position the heaters were polled at
    pub position: usize,
    /// Poll outcome per heater, indexed like [`DeviceId::index`]
    pub polls: [PollOutcome; 2],
    /// Host frames handled this tick
    pub commands: CommandLog,
    /// Stray host bytes thrown away
    pub purged: usize,
    /// Set when this tick closed a cycle
    pub rollover: Option<Rollover>,
    /// Pellet level reports sent at the wrap
    pub fuel: [Option<StatusUpdate>; 2],
    /// Host writes failed since start-up
    pub host_write_errors: u32,
}

impl TickReport {
    /// True if this tick wrapped the cursor
    pub fn cycle_complete(&self) -> bool {
        self.rollover.is_some()
    }
}

/// The bridge: two heaters, the host and the cycle state
pub struct Bridge<H: Uart, L, S, D> {
    host: HostPort<H>,
    heaters: [Heater<L>; 2],
    fuel: Option<FuelReporter<S>>,
    cycle: CycleState,
    processor: CommandProcessor,
    delay: D,
    step_delay_ms: u32,
}

impl<H, L, S, D> Bridge<H, L, S, D>
where
    H: Uart,
    L: Uart,
    S: RangeSensor,
    D: DelayNs,
{
    /// Assemble the bridge
    ///
    /// `heater_links` are in device order. `fuel` is dropped when pellet
    /// sensors are disabled in `config`.
    pub fn new(
        config: &BridgeConfig,
        host: H,
        heater_links: [L; 2],
        fuel: Option<FuelReporter<S>>,
        delay: D,
    ) -> Self {
        let [first, second] = heater_links;
        Self {
            host: HostPort::new(host),
            heaters: [
                Heater::new(DeviceId::Heater1, first),
                Heater::new(DeviceId::Heater2, second),
            ],
            fuel: fuel.filter(|_| config.pellet_sensors_enabled),
            cycle: CycleState::new(MAX_PROBES),
            processor: CommandProcessor::new(config.settle_delay_ms),
            delay,
            step_delay_ms: config.step_delay_ms,
        }
    }

    /// Run one cursor step
    pub fn tick(&mut self) -> TickReport {
        let position = self.cycle.position();

        let mut polls = [PollOutcome::Idle; 2];
        for (slot, heater) in self.heaters.iter_mut().enumerate() {
            let outcome = heater.poll(position, &self.cycle);
            if let Some(update) = outcome.update() {
                self.host.send(update);
            }
            polls[slot] = outcome;
            self.delay.delay_ms(self.step_delay_ms);
        }

        let commands = self.processor.drain(
            &mut self.host,
            &mut self.heaters,
            &mut self.cycle,
            &mut self.delay,
        );
        let purged = self.processor.purge(&mut self.host);

        let rollover = self.cycle.advance();
        let mut fuel = [None; 2];
        if let (Some(_), Some(reporter)) = (rollover, self.fuel.as_mut()) {
            for device in DeviceId::ALL {
                // The wrap clears the force flag before pellet levels are
                // checked and arms the next one after, so only a changed
                // reading is sent here
                let report = reporter.check(device, false);
                if let Some(update) = report {
                    self.host.send(update);
                }
                fuel[device.index()] = report;
            }
        }

        TickReport {
            position,
            polls,
            commands,
            purged,
            rollover,
            fuel,
            host_write_errors: self.host.write_errors(),
        }
    }

    pub fn cycle(&self) -> &CycleState {
        &self.cycle
    }

    pub fn heater(&self, device: DeviceId) -> &Heater<L> {
        &self.heaters[device.index()]
    }

    /// True if pellet levels are ranged at each wrap
    pub fn fuel_enabled(&self) -> bool {
        self.fuel.is_some()
    }

    /// Error of the most recent failed host write, cleared on read
    pub fn take_host_error(&mut self) -> Option<<H as UartTx>::Error> {
        self.host.take_error()
    }
}

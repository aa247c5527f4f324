//! Bridge task
//!
//! Ticks the bridge forever. Heater reads block inside a tick; the pauses
//! between ticks are awaited. The status LED is lit during the cycle pause.

use defmt::*;
use embassy_stm32::gpio::{Input, Output};
use embassy_time::{Delay, Timer};

use stovelink_core::command::CommandOutcome;
use stovelink_core::poller::PollOutcome;
use stovelink_core::{Bridge, TickReport};
use stovelink_drivers::sensor::Ultrasonic;
use stovelink_hal_stm32::{EmbassyClock, HeaterLink, HostLink, UartBusError};
use stovelink_protocol::DeviceId;

/// Ultrasonic sensor above one hopper
pub type PelletSensor = Ultrasonic<Output<'static>, Input<'static>, Delay, EmbassyClock>;

/// The bridge as wired on this board
pub type FirmwareBridge = Bridge<HostLink, HeaterLink, PelletSensor, Delay>;

/// Waits between ticks
#[derive(Clone, Copy)]
pub struct Pacing {
    /// After an ordinary tick (ms)
    pub step_delay_ms: u32,
    /// After the tick that closes a cycle (ms)
    pub cycle_pause_ms: u32,
}

/// Bridge task - polls the heaters and serves the host forever
#[embassy_executor::task]
pub async fn bridge_task(mut bridge: FirmwareBridge, mut led: Output<'static>, pacing: Pacing) {
    info!(
        "Bridge task started (pellet sensors {})",
        if bridge.fuel_enabled() { "on" } else { "off" }
    );

    loop {
        let report = bridge.tick();
        log_report(&report);

        if let Some(err) = bridge.take_host_error() {
            warn!(
                "Host write failed: {:?} ({} total)",
                UartBusError::from(err),
                report.host_write_errors
            );
        }

        if report.cycle_complete() {
            led.set_high();
            Timer::after_millis(u64::from(pacing.cycle_pause_ms)).await;
            led.set_low();
        } else {
            Timer::after_millis(u64::from(pacing.step_delay_ms)).await;
        }
    }
}

fn log_report(report: &TickReport) {
    for device in DeviceId::ALL {
        log_poll(device, report.position, &report.polls[device.index()]);
    }

    for outcome in &report.commands {
        log_command(outcome);
    }

    if report.purged > 0 {
        warn!("Discarded {} stray host bytes", report.purged);
    }

    if let Some(rollover) = report.rollover {
        debug!(
            "Cycle complete (forced: {}, next forced: {})",
            rollover.forced, rollover.next_forced
        );
        for update in report.fuel.iter().flatten() {
            debug!("Pellet level {:?}: {} cm", update.device, update.value1);
        }
    }
}

fn log_poll(device: DeviceId, position: usize, outcome: &PollOutcome) {
    match outcome {
        PollOutcome::Idle => {}
        PollOutcome::Unchanged => trace!("{:?} probe {}: unchanged", device, position),
        PollOutcome::Report(update) => debug!(
            "{:?} {:?} = {} ({})",
            device, update.value_type, update.value1, update.value2
        ),
        PollOutcome::Skipped(failure) => {
            warn!("{:?} probe {} skipped: {:?}", device, position, failure)
        }
        PollOutcome::Unrecognized { update, raw } => warn!(
            "{:?} probe {}: unrecognized response {:?}, sent {:?} = {}",
            device, position, raw, update.value_type, update.value1
        ),
    }
}

fn log_command(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::ForceResend => info!("Host requested a full resend"),
        CommandOutcome::Accepted { device, request } => {
            info!("{:?} accepted {:?}", device, request)
        }
        CommandOutcome::BadChecksum { frame } => {
            warn!("Host frame with bad checksum: {:?}", frame)
        }
        CommandOutcome::DeviceRejected { device, response } => {
            warn!("{:?} rejected write, answered {:?}", device, response)
        }
        CommandOutcome::NoResponse { device } => warn!("{:?} did not answer the write", device),
        CommandOutcome::Ignored { frame } => debug!("Ignored host frame {:?}", frame),
    }
}

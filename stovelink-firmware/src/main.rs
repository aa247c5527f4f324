//! Stovelink - Pellet Stove Serial Bridge Firmware
//!
//! Polls two pellet stoves over their single-wire service ports and relays
//! their state to a home automation host on a separate UART. The host can
//! switch the stoves, set their power and ask for a full status resend.
//!
//! Board: Nucleo-F401RE
//! - USART2 (PA2 TX, PA3 RX): host link, routed to the ST-LINK VCP
//! - USART1 (PA9): heater 1 service port, single wire
//! - USART6 (PC6): heater 2 service port, single wire
//! - PB5/PB4, PB3/PA10: pellet sensor trigger/echo for heater 1 and 2
//! - PA5: user LED, lit during the cycle pause

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::peripherals::{USART1, USART2, USART6};
use embassy_stm32::usart::{
    BufferedInterruptHandler, BufferedUart, HalfDuplexConfig, HalfDuplexReadback,
};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use stovelink_core::fuel::FuelReporter;
use stovelink_core::Bridge;
use stovelink_drivers::sensor::Ultrasonic;
use stovelink_hal_stm32::uart::usart_config;
use stovelink_hal_stm32::{heater_link, host_link, EmbassyClock};

use crate::tasks::{Pacing, PelletSensor};

mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    USART1 => BufferedInterruptHandler<USART1>;
    USART2 => BufferedInterruptHandler<USART2>;
    USART6 => BufferedInterruptHandler<USART6>;
});

/// Host reads give up quickly; complete frames are already buffered
const HOST_READ_TIMEOUT_MS: u32 = 50;

// Static cells for UART buffers (must live forever)
static HOST_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static HOST_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static HEATER1_TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static HEATER1_RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
static HEATER2_TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static HEATER2_RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Stovelink firmware starting...");

    let p = embassy_stm32::init(Default::default());
    let config = config::bridge_config();
    info!(
        "Host {} baud, heaters {} baud, read timeout {} ms",
        config.host_baud, config.heater_baud, config.read_timeout_ms
    );

    // Host link: full duplex
    let host_uart = unwrap!(BufferedUart::new(
        p.USART2,
        p.PA3,
        p.PA2,
        HOST_TX_BUF.init([0; 64]),
        HOST_RX_BUF.init([0; 256]),
        Irqs,
        usart_config(&config.host_uart()),
    ));
    let host = host_link(host_uart, HOST_READ_TIMEOUT_MS);

    // Heater service ports: single wire, our own bytes not read back
    let heater1_uart = unwrap!(BufferedUart::new_half_duplex(
        p.USART1,
        p.PA9,
        Irqs,
        HEATER1_TX_BUF.init([0; 16]),
        HEATER1_RX_BUF.init([0; 32]),
        usart_config(&config.heater_uart()),
        HalfDuplexReadback::NoReadback,
        HalfDuplexConfig::OpenDrainInternal,
    ));
    let heater2_uart = unwrap!(BufferedUart::new_half_duplex(
        p.USART6,
        p.PC6,
        Irqs,
        HEATER2_TX_BUF.init([0; 16]),
        HEATER2_RX_BUF.init([0; 32]),
        usart_config(&config.heater_uart()),
        HalfDuplexReadback::NoReadback,
        HalfDuplexConfig::OpenDrainInternal,
    ));
    let heaters = [
        heater_link(heater1_uart, config.read_timeout_ms),
        heater_link(heater2_uart, config.read_timeout_ms),
    ];

    // Pellet level sensors
    let max_cm = config.pellet_max_distance_cm;
    let sensor1: PelletSensor = Ultrasonic::new(
        Output::new(p.PB5, Level::Low, Speed::Low),
        Input::new(p.PB4, Pull::Down),
        Delay,
        EmbassyClock,
        max_cm,
    );
    let sensor2: PelletSensor = Ultrasonic::new(
        Output::new(p.PB3, Level::Low, Speed::Low),
        Input::new(p.PA10, Pull::Down),
        Delay,
        EmbassyClock,
        max_cm,
    );
    let fuel = Some(FuelReporter::new([sensor1, sensor2]));

    let bridge = Bridge::new(&config, host, heaters, fuel, Delay);
    let led = Output::new(p.PA5, Level::Low, Speed::Low);
    let pacing = Pacing {
        step_delay_ms: config.step_delay_ms,
        cycle_pause_ms: config.cycle_pause_ms,
    };

    info!("Spawning tasks...");
    spawner.spawn(tasks::bridge_task(bridge, led, pacing)).unwrap();

    info!("Stovelink running");
}

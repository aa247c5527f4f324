//! Ultrasonic trigger/echo ranging
//!
//! HC-SR04 and compatible modules: a 10 µs pulse on TRIG starts a burst,
//! ECHO then stays high for the round trip time of the sound.
//!
//! Timing is done by polling the echo pin against a microsecond clock, so
//! readings are only as good as the polling loop is tight. At 57 µs per
//! centimeter that is ample for pellet levels.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use stovelink_core::traits::RangeSensor;
use stovelink_hal::Clock;

/// Echo time per centimeter of distance (out and back), in µs
pub const US_ROUNDTRIP_CM: u64 = 57;

/// Length of the trigger pulse (µs)
const TRIGGER_PULSE_US: u32 = 10;

/// Low time before the trigger pulse (µs)
const TRIGGER_SETTLE_US: u32 = 4;

/// How long the module may take to raise ECHO after the trigger (µs)
const ECHO_START_TIMEOUT_US: u64 = 5_800;

/// Convert an echo pulse width to centimeters, rounding to nearest
///
/// Any nonzero echo is at least 1 cm, so it never reads as "no echo".
pub fn echo_to_cm(echo_us: u64) -> u16 {
    if echo_us == 0 {
        return 0;
    }
    let cm = (echo_us + US_ROUNDTRIP_CM / 2) / US_ROUNDTRIP_CM;
    u16::try_from(cm.max(1)).unwrap_or(u16::MAX)
}

/// Trigger/echo ultrasonic sensor
pub struct Ultrasonic<TRIG, ECHO, D, C> {
    trigger: TRIG,
    echo: ECHO,
    delay: D,
    clock: C,
    max_distance_cm: u16,
}

impl<TRIG, ECHO, D, C> Ultrasonic<TRIG, ECHO, D, C>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
    C: Clock,
{
    /// Create a sensor; echoes beyond `max_distance_cm` read as 0
    pub fn new(trigger: TRIG, echo: ECHO, delay: D, clock: C, max_distance_cm: u16) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            max_distance_cm,
        }
    }

    pub fn max_distance_cm(&self) -> u16 {
        self.max_distance_cm
    }

    /// Longest echo accepted, in µs
    fn max_echo_us(&self) -> u64 {
        u64::from(self.max_distance_cm) * US_ROUNDTRIP_CM + US_ROUNDTRIP_CM / 2
    }

    fn fire(&mut self) -> Result<(), ()> {
        self.trigger.set_low().map_err(|_| ())?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high().map_err(|_| ())?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| ())
    }

    /// Measure the echo pulse, `None` on timeout or pin error
    fn measure_echo_us(&mut self) -> Option<u64> {
        self.fire().ok()?;

        let start = self.clock.now_us();
        while !self.echo.is_high().ok()? {
            if self.clock.elapsed_us(start) > ECHO_START_TIMEOUT_US {
                return None;
            }
        }

        let rise = self.clock.now_us();
        let max_echo_us = self.max_echo_us();
        while self.echo.is_high().ok()? {
            if self.clock.elapsed_us(rise) > max_echo_us {
                return None;
            }
        }

        Some(self.clock.elapsed_us(rise))
    }
}

impl<TRIG, ECHO, D, C> RangeSensor for Ultrasonic<TRIG, ECHO, D, C>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
    C: Clock,
{
    fn read_distance_cm(&mut self) -> u16 {
        match self.measure_echo_us() {
            Some(echo_us) if echo_us <= self.max_echo_us() => echo_to_cm(echo_us),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Simulated time in µs, shared by all the fakes
    type Time = Rc<Cell<u64>>;

    /// Clock that moves 5 µs forward per reading
    struct SimClock(Time);

    impl Clock for SimClock {
        fn now_us(&self) -> u64 {
            let now = self.0.get();
            self.0.set(now + 5);
            now
        }
    }

    struct SimDelay(Time);

    impl DelayNs for SimDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.set(self.0.get() + u64::from(ns / 1000));
        }
    }

    /// Records (time, level) of every trigger edge
    struct Trigger {
        time: Time,
        edges: Rc<std::cell::RefCell<Vec<(u64, bool)>>>,
    }

    impl ErrorType for Trigger {
        type Error = Infallible;
    }

    impl OutputPin for Trigger {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.edges.borrow_mut().push((self.time.get(), false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.edges.borrow_mut().push((self.time.get(), true));
            Ok(())
        }
    }

    /// High from `rise` (inclusive) to `fall` (exclusive), absolute µs
    struct Echo {
        time: Time,
        window: Option<(u64, u64)>,
    }

    impl ErrorType for Echo {
        type Error = Infallible;
    }

    impl InputPin for Echo {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let now = self.time.get();
            Ok(matches!(self.window, Some((rise, fall)) if now >= rise && now < fall))
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|high| !high)
        }
    }

    type Sim = Ultrasonic<Trigger, Echo, SimDelay, SimClock>;

    fn sim_sensor(window: Option<(u64, u64)>, max_cm: u16) -> (Sim, Rc<std::cell::RefCell<Vec<(u64, bool)>>>) {
        let time: Time = Rc::new(Cell::new(0));
        let edges = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sensor = Ultrasonic::new(
            Trigger {
                time: time.clone(),
                edges: edges.clone(),
            },
            Echo {
                time: time.clone(),
                window,
            },
            SimDelay(time.clone()),
            SimClock(time),
            max_cm,
        );
        (sensor, edges)
    }

    #[test]
    fn test_echo_conversion() {
        assert_eq!(echo_to_cm(0), 0);
        assert_eq!(echo_to_cm(10), 1);
        assert_eq!(echo_to_cm(57), 1);
        assert_eq!(echo_to_cm(85), 1);
        assert_eq!(echo_to_cm(86), 2);
        assert_eq!(echo_to_cm(57 * 120), 120);
    }

    #[test]
    fn test_trigger_pulse() {
        let (mut sensor, edges) = sim_sensor(None, 200);
        sensor.read_distance_cm();
        let edges = edges.borrow();
        assert_eq!(edges[..], [(0, false), (4, true), (14, false)]);
    }

    #[test]
    fn test_distance_from_echo_width() {
        // Echo rises at 100 µs and lasts 2850 µs: 50 cm
        let (mut sensor, _) = sim_sensor(Some((100, 100 + 2850)), 200);
        assert_eq!(sensor.read_distance_cm(), 50);
    }

    #[test]
    fn test_no_echo_reads_zero() {
        let (mut sensor, _) = sim_sensor(None, 200);
        assert_eq!(sensor.read_distance_cm(), 0);
    }

    #[test]
    fn test_beyond_max_distance_reads_zero() {
        // 150 cm echo with a 100 cm cutoff
        let (mut sensor, _) = sim_sensor(Some((50, 50 + 150 * 57)), 100);
        assert_eq!(sensor.read_distance_cm(), 0);

        let (mut sensor, _) = sim_sensor(Some((50, 50 + 150 * 57)), 200);
        assert_eq!(sensor.read_distance_cm(), 150);
    }
}

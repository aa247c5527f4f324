//! Monotonic time source

/// Free-running microsecond clock
///
/// Used for read timeouts and for timing echo pulses. Only differences
/// between two readings are meaningful.
pub trait Clock {
    /// Microseconds since an arbitrary fixed point
    fn now_us(&self) -> u64;

    /// Microseconds elapsed since `start`
    fn elapsed_us(&self, start: u64) -> u64 {
        self.now_us().saturating_sub(start)
    }
}

impl<C: Clock> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

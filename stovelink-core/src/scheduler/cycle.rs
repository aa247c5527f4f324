//! Shared cursor and per-cycle flags
//!
//! The cursor runs over the longer of the two probe tables. Reaching its
//! end closes a cycle: the first one establishes the cache baseline, later
//! ones may carry a forced full report.
//!
//! Forcing is a two-flag handshake. A host request only arms the pending
//! flag; the flag takes effect at the next wrap so the forced report
//! always covers one complete cycle.

/// Summary of a cycle that just ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rollover {
    /// The ended cycle reported every value
    pub forced: bool,
    /// The next cycle will report every value
    pub next_forced: bool,
}

/// Cursor position and force/baseline flags
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleState {
    position: usize,
    cycle_len: usize,
    first_run_complete: bool,
    force_send_values: bool,
    force_send_at_next_run: bool,
}

impl CycleState {
    /// Fresh state at power-up
    ///
    /// A forced report is already pending, so the host gets a full
    /// snapshot right after the baseline pass.
    pub fn new(cycle_len: usize) -> Self {
        Self {
            position: 0,
            cycle_len: cycle_len.max(1),
            first_run_complete: false,
            force_send_values: false,
            force_send_at_next_run: true,
        }
    }

    /// Current cursor position, always below the cycle length
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn cycle_len(&self) -> usize {
        self.cycle_len
    }

    /// True once the baseline pass is done
    pub fn first_run_complete(&self) -> bool {
        self.first_run_complete
    }

    /// True while the current cycle reports every value
    pub fn is_forced(&self) -> bool {
        self.force_send_values
    }

    /// True if a forced report waits for the next cycle
    pub fn force_pending(&self) -> bool {
        self.force_send_at_next_run
    }

    /// Ask for every value to be reported during the next full cycle
    pub fn request_force(&mut self) {
        self.force_send_at_next_run = true;
    }

    /// Decide whether a successful read is reported
    pub fn should_report(&self, changed: bool) -> bool {
        self.force_send_values || (self.first_run_complete && changed)
    }

    /// Move the cursor one step, handling the wrap
    pub fn advance(&mut self) -> Option<Rollover> {
        self.position += 1;
        if self.position < self.cycle_len {
            return None;
        }

        self.position = 0;
        self.first_run_complete = true;

        let forced = self.force_send_values;
        self.force_send_values = false;
        if self.force_send_at_next_run {
            self.force_send_values = true;
            self.force_send_at_next_run = false;
        }

        Some(Rollover {
            forced,
            next_forced: self.force_send_values,
        })
    }

    #[cfg(test)]
    pub(crate) fn mark_baseline_complete(&mut self) {
        self.first_run_complete = true;
        self.force_send_at_next_run = false;
    }

    #[cfg(test)]
    pub(crate) fn set_forced(&mut self, forced: bool) {
        self.force_send_values = forced;
    }
}

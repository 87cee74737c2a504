//! Poll port - bounds the busy-waits of the bus driver
//!
//! Every wait on the MSSP peripheral asks its [`PollBudget`] after each busy
//! poll whether to keep going. [`Forever`] reproduces the plain firmware
//! behaviour of spinning until the hardware idles; [`SpinLimit`] lets tests
//! and watchdog-minded callers put an upper bound on a stall.

/// Hook consulted by every busy-wait loop
pub trait PollBudget {
    /// Called once before a wait starts
    fn restart(&mut self) {}

    /// Called after each poll that found the bus busy.
    ///
    /// Return `false` to abandon the wait.
    fn keep_polling(&mut self) -> bool;
}

impl<B: PollBudget + ?Sized> PollBudget for &mut B {
    fn restart(&mut self) {
        (**self).restart()
    }

    fn keep_polling(&mut self) -> bool {
        (**self).keep_polling()
    }
}

/// Never gives up. A bus that never idles hangs the caller.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Forever;

impl PollBudget for Forever {
    #[inline]
    fn keep_polling(&mut self) -> bool {
        true
    }
}

/// Gives up after a fixed number of busy polls per wait
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpinLimit {
    limit: u32,
    spins: u32,
}

impl SpinLimit {
    pub const fn new(limit: u32) -> Self {
        Self { limit, spins: 0 }
    }

    /// Busy polls seen in the current wait
    pub const fn spins(&self) -> u32 {
        self.spins
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

impl PollBudget for SpinLimit {
    fn restart(&mut self) {
        self.spins = 0;
    }

    fn keep_polling(&mut self) -> bool {
        self.spins = self.spins.saturating_add(1);
        self.spins < self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forever_keeps_polling() {
        let mut budget = Forever;
        budget.restart();
        assert!((0..10_000).all(|_| budget.keep_polling()));
    }

    #[test]
    fn test_spin_limit_gives_up() {
        let mut budget = SpinLimit::new(3);
        budget.restart();
        assert!(budget.keep_polling());
        assert!(budget.keep_polling());
        assert!(!budget.keep_polling());
        assert_eq!(budget.spins(), 3);
    }

    #[test]
    fn test_spin_limit_restart_resets() {
        let mut budget = SpinLimit::new(2);
        assert!(budget.keep_polling());
        assert!(!budget.keep_polling());
        budget.restart();
        assert_eq!(budget.spins(), 0);
        assert!(budget.keep_polling());
    }
}

//! Frame-counted timer shared by cooldowns, tells, breathers and state gates.

use serde::{Deserialize, Serialize};

/// An integer countdown decremented once per active tick.
///
/// `tick` never underflows, so every countdown stays `>= 0`. Freezing the
/// calls to `tick` freezes the timer with no drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// A countdown that is already done.
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    /// A countdown that finishes after `frames` ticks.
    pub const fn armed(frames: u32) -> Self {
        Self { remaining: frames }
    }

    /// Restart with `frames` ticks to go.
    pub fn arm(&mut self, frames: u32) {
        self.remaining = frames;
    }

    /// Advance one tick. Returns true once the countdown has reached zero.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn cancel(&mut self) {
        self.remaining = 0;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_countdown_finishes_after_exact_frames() {
        let mut c = Countdown::armed(3);
        assert!(!c.tick());
        assert!(!c.tick());
        assert!(c.tick());
        assert!(c.is_done());
    }

    #[test]
    fn tick_on_idle_stays_at_zero() {
        let mut c = Countdown::idle();
        assert!(c.tick());
        assert!(c.tick());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn rearm_and_cancel() {
        let mut c = Countdown::armed(2);
        c.tick();
        c.arm(5);
        assert_eq!(c.remaining(), 5);
        assert!(c.is_running());
        c.cancel();
        assert!(c.is_done());
    }
}

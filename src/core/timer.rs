//! Cancellable scheduled tasks.
//!
//! Nothing here reads a clock. The host pumps elapsed time in through `advance`,
//! which keeps every game deterministic under test and lets a single-threaded
//! loop own all timing.

use std::time::Duration;

/// One countdown step. All game countdowns are expressed in these units.
pub const TIME_UNIT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Once,
    Every,
}

#[derive(Debug, Clone)]
struct Armed {
    period: Duration,
    elapsed: Duration,
    schedule: Schedule,
}

/// Holds at most one scheduled task. Arming replaces (cancels) whatever was
/// armed before.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    armed: Option<Armed>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_once(&mut self, delay: Duration) {
        self.arm(delay, Schedule::Once);
    }

    pub fn arm_every(&mut self, period: Duration) {
        self.arm(period, Schedule::Every);
    }

    fn arm(&mut self, period: Duration, schedule: Schedule) {
        // A zero period would fire forever inside a single `advance`.
        let period = period.max(Duration::from_millis(1));
        self.armed = Some(Armed {
            period,
            elapsed: Duration::ZERO,
            schedule,
        });
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Time until the next firing, if armed.
    pub fn remaining(&self) -> Option<Duration> {
        self.armed
            .as_ref()
            .map(|a| a.period.saturating_sub(a.elapsed))
    }

    /// Advance by `dt` and return how many times the task fired.
    /// A one-shot task fires at most once and then disarms itself.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let Some(armed) = self.armed.as_mut() else {
            return 0;
        };

        armed.elapsed += dt;
        let mut fired = 0;
        let mut finished = false;
        while armed.elapsed >= armed.period {
            armed.elapsed -= armed.period;
            fired += 1;
            if armed.schedule == Schedule::Once {
                finished = true;
                break;
            }
        }
        if finished {
            self.armed = None;
        }
        fired
    }
}

/// Whole-unit countdown built on a repeating `TimerSlot`.
#[derive(Debug, Clone)]
pub struct Countdown {
    slot: TimerSlot,
    unit: Duration,
    remaining: u32,
}

impl Countdown {
    pub fn new(unit: Duration) -> Self {
        Self {
            slot: TimerSlot::new(),
            unit,
            remaining: 0,
        }
    }

    /// Starts (or restarts) the countdown. Any previous run is cancelled first.
    pub fn start(&mut self, units: u32) {
        self.slot.cancel();
        self.remaining = units;
        if units > 0 {
            self.slot.arm_every(self.unit);
        }
    }

    pub fn cancel(&mut self) {
        self.slot.cancel();
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_armed()
    }

    /// Returns `true` exactly once: on the advance that brings the count to zero.
    /// Surplus firings past zero are dropped.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let fired = self.slot.advance(dt);
        for _ in 0..fired {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.slot.cancel();
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once_then_disarms() {
        let mut t = TimerSlot::new();
        t.arm_once(Duration::from_millis(1600));

        assert_eq!(t.advance(Duration::from_millis(1000)), 0);
        assert!(t.is_armed());
        assert_eq!(t.remaining(), Some(Duration::from_millis(600)));

        assert_eq!(t.advance(Duration::from_millis(5000)), 1);
        assert!(!t.is_armed());
        assert_eq!(t.advance(Duration::from_millis(5000)), 0);
    }

    #[test]
    fn repeating_fires_per_period_and_carries_remainder() {
        let mut t = TimerSlot::new();
        t.arm_every(Duration::from_millis(1000));

        assert_eq!(t.advance(Duration::from_millis(2500)), 2);
        assert_eq!(t.advance(Duration::from_millis(500)), 1);
        assert!(t.is_armed());
    }

    #[test]
    fn rearming_replaces_previous_task() {
        let mut t = TimerSlot::new();
        t.arm_every(Duration::from_millis(100));
        t.advance(Duration::from_millis(50));
        t.arm_once(Duration::from_millis(1000));

        assert_eq!(t.advance(Duration::from_millis(900)), 0);
        assert_eq!(t.advance(Duration::from_millis(100)), 1);
        assert!(!t.is_armed());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = TimerSlot::new();
        t.arm_every(Duration::from_millis(10));
        t.cancel();
        assert_eq!(t.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn countdown_expires_exactly_once() {
        let mut c = Countdown::new(TIME_UNIT);
        c.start(3);

        assert!(!c.advance(TIME_UNIT * 2));
        assert_eq!(c.remaining(), 1);
        assert!(c.advance(TIME_UNIT * 5));
        assert_eq!(c.remaining(), 0);
        assert!(!c.is_running());
        assert!(!c.advance(TIME_UNIT));
    }

    #[test]
    fn countdown_restart_resets_count() {
        let mut c = Countdown::new(TIME_UNIT);
        c.start(2);
        c.advance(TIME_UNIT);
        c.start(2);
        assert_eq!(c.remaining(), 2);
        assert!(!c.advance(TIME_UNIT));
        assert!(c.advance(TIME_UNIT));
    }
}

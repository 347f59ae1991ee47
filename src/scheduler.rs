//! Clock-driven timers for the game loop
//!
//! Nothing here reads a clock. The host passes `now` (time since some fixed
//! origin) into every call, so a test can drive time by hand and a browser
//! host can pass its animation-frame timestamp.

use std::time::Duration;

use crate::sim::FoodKind;

/// A timeout that fires once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OneShot {
    #[default]
    Idle,
    Armed {
        due: Duration,
    },
    /// Paused with time still on it
    Suspended {
        remaining: Duration,
    },
}

impl OneShot {
    pub fn armed(now: Duration, delay: Duration) -> Self {
        OneShot::Armed { due: now + delay }
    }

    pub fn arm(&mut self, now: Duration, delay: Duration) {
        *self = Self::armed(now, delay);
    }

    pub fn cancel(&mut self) {
        *self = OneShot::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, OneShot::Idle)
    }

    /// Capture the residual; no-op unless armed
    pub fn suspend(&mut self, now: Duration) {
        if let OneShot::Armed { due } = *self {
            *self = OneShot::Suspended {
                remaining: due.saturating_sub(now),
            };
        }
    }

    /// Re-arm with the captured residual; no-op unless suspended
    pub fn resume(&mut self, now: Duration) {
        if let OneShot::Suspended { remaining } = *self {
            *self = OneShot::armed(now, remaining);
        }
    }

    /// Time left before firing, `None` when idle
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        match *self {
            OneShot::Idle => None,
            OneShot::Armed { due } => Some(due.saturating_sub(now)),
            OneShot::Suspended { remaining } => Some(remaining),
        }
    }

    /// Fire if due. A fired timer goes back to idle.
    pub fn poll(&mut self, now: Duration) -> bool {
        match *self {
            OneShot::Armed { due } if now >= due => {
                *self = OneShot::Idle;
                true
            }
            _ => false,
        }
    }
}

/// Repeating timer with a fixed period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next_due: Duration,
}

impl Interval {
    /// First firing is one full period after `now`
    pub fn new(now: Duration, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Number of periods elapsed since the last poll
    pub fn poll(&mut self, now: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        let mut fired = 0;
        while now >= self.next_due {
            fired += 1;
            self.next_due += self.period;
        }
        fired
    }
}

/// Counters for timer bookkeeping, checked by tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerStats {
    pub countdowns_armed: u64,
    pub countdowns_cancelled: u64,
    pub frames_requested: u64,
}

impl TimerStats {
    /// Countdowns armed and never cancelled
    pub fn live_countdowns(&self) -> u64 {
        self.countdowns_armed - self.countdowns_cancelled
    }
}

/// Every timer the driver owns
#[derive(Debug, Default)]
pub struct Timers {
    frame_requested: bool,
    countdown: Option<Interval>,
    /// Sticky-mine freeze
    pub freeze: OneShot,
    spawns: Vec<(FoodKind, OneShot)>,
    last_wall_hit: Option<Duration>,
    stats: TimerStats,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> TimerStats {
        self.stats
    }

    // === Frame loop ===

    pub fn request_frame(&mut self) {
        if !self.frame_requested {
            self.frame_requested = true;
            self.stats.frames_requested += 1;
        }
    }

    pub fn cancel_frame(&mut self) {
        self.frame_requested = false;
    }

    pub fn wants_frame(&self) -> bool {
        self.frame_requested
    }

    /// Consume the pending frame request
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    // === Countdown ===

    /// Start a fresh countdown, replacing any existing one
    pub fn arm_countdown(&mut self, now: Duration, period: Duration) {
        self.cancel_countdown();
        self.countdown = Some(Interval::new(now, period));
        self.stats.countdowns_armed += 1;
    }

    pub fn cancel_countdown(&mut self) {
        if self.countdown.take().is_some() {
            self.stats.countdowns_cancelled += 1;
        }
    }

    pub fn has_countdown(&self) -> bool {
        self.countdown.is_some()
    }

    /// Seconds elapsed on the countdown since the last poll
    pub fn poll_countdown(&mut self, now: Duration) -> u32 {
        self.countdown.as_mut().map_or(0, |c| c.poll(now))
    }

    // === Level spawns ===

    pub fn arm_spawn(&mut self, kind: FoodKind, now: Duration, delay: Duration) {
        self.spawns.push((kind, OneShot::armed(now, delay)));
    }

    /// Kinds whose spawn delay ran out, in arming order
    pub fn poll_spawns(&mut self, now: Duration) -> Vec<FoodKind> {
        let mut due = Vec::new();
        for (kind, timer) in &mut self.spawns {
            if timer.poll(now) {
                due.push(*kind);
            }
        }
        self.spawns.retain(|(_, timer)| !timer.is_idle());
        due
    }

    pub fn pending_spawns(&self) -> usize {
        self.spawns.len()
    }

    pub fn cancel_spawns(&mut self) {
        self.spawns.clear();
    }

    pub fn resume_spawns(&mut self, now: Duration) {
        for (_, timer) in &mut self.spawns {
            timer.resume(now);
        }
    }

    // === Rate limiting ===

    /// True if a wall-hit cue may play now; records the hit if so
    pub fn try_wall_hit(&mut self, now: Duration, cooldown: Duration) -> bool {
        if let Some(last) = self.last_wall_hit {
            if now.saturating_sub(last) < cooldown {
                return false;
            }
        }
        self.last_wall_hit = Some(now);
        true
    }

    // === Bulk operations ===

    /// Pause: stop frames and countdown, keep residuals of one-shots
    pub fn suspend_all(&mut self, now: Duration) {
        self.cancel_frame();
        self.cancel_countdown();
        self.freeze.suspend(now);
        for (_, timer) in &mut self.spawns {
            timer.suspend(now);
        }
    }

    /// Transition or game over: drop everything
    pub fn stop_all(&mut self) {
        self.cancel_frame();
        self.cancel_countdown();
        self.freeze.cancel();
        self.cancel_spawns();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut t = OneShot::armed(ms(0), ms(100));
        assert!(!t.poll(ms(99)));
        assert!(t.poll(ms(100)));
        assert!(!t.poll(ms(200)));
        assert!(t.is_idle());
    }

    #[test]
    fn test_suspended_residual() {
        let mut t = OneShot::armed(ms(0), ms(5000));
        t.suspend(ms(1200));
        assert_eq!(t.remaining(ms(99_999)), Some(ms(3800)));
        // Suspended timers never fire
        assert!(!t.poll(ms(99_999)));

        t.resume(ms(10_000));
        assert!(!t.poll(ms(13_799)));
        assert!(t.poll(ms(13_800)));
    }

    #[test]
    fn test_suspend_after_due_leaves_zero() {
        let mut t = OneShot::armed(ms(0), ms(100));
        t.suspend(ms(250));
        assert_eq!(t, OneShot::Suspended { remaining: ms(0) });
    }

    #[test]
    fn test_interval_catches_up() {
        let mut i = Interval::new(ms(0), ms(1000));
        assert_eq!(i.poll(ms(999)), 0);
        assert_eq!(i.poll(ms(1000)), 1);
        assert_eq!(i.poll(ms(3500)), 2);
        assert_eq!(i.poll(ms(3999)), 0);
    }

    #[test]
    fn test_single_countdown() {
        let mut timers = Timers::new();
        timers.arm_countdown(ms(0), ms(1000));
        timers.arm_countdown(ms(10), ms(1000));
        timers.arm_countdown(ms(20), ms(1000));
        let stats = timers.stats();
        assert_eq!(stats.countdowns_armed, 3);
        assert_eq!(stats.countdowns_cancelled, 2);
        assert_eq!(stats.live_countdowns(), 1);

        // Only the newest one ticks
        assert_eq!(timers.poll_countdown(ms(1019)), 0);
        assert_eq!(timers.poll_countdown(ms(1020)), 1);

        timers.cancel_countdown();
        timers.cancel_countdown();
        assert_eq!(timers.stats().live_countdowns(), 0);
        assert_eq!(timers.poll_countdown(ms(5000)), 0);
    }

    #[test]
    fn test_frame_request_is_consumed() {
        let mut timers = Timers::new();
        assert!(!timers.take_frame());
        timers.request_frame();
        timers.request_frame();
        assert_eq!(timers.stats().frames_requested, 1);
        assert!(timers.take_frame());
        assert!(!timers.take_frame());
    }

    #[test]
    fn test_spawns_suspend_and_fire() {
        let mut timers = Timers::new();
        timers.arm_spawn(FoodKind::Bonus, ms(0), ms(5000));
        timers.arm_spawn(FoodKind::Forbidden, ms(0), ms(5000));
        timers.suspend_all(ms(2000));
        assert!(timers.poll_spawns(ms(6000)).is_empty());

        timers.resume_spawns(ms(6000));
        assert!(timers.poll_spawns(ms(8999)).is_empty());
        assert_eq!(
            timers.poll_spawns(ms(9000)),
            vec![FoodKind::Bonus, FoodKind::Forbidden]
        );
        assert_eq!(timers.pending_spawns(), 0);
    }

    #[test]
    fn test_wall_hit_cooldown() {
        let mut timers = Timers::new();
        let cooldown = ms(150);
        assert!(timers.try_wall_hit(ms(1000), cooldown));
        assert!(!timers.try_wall_hit(ms(1100), cooldown));
        assert!(timers.try_wall_hit(ms(1150), cooldown));
    }

    #[test]
    fn test_stop_all_clears_everything() {
        let mut timers = Timers::new();
        timers.request_frame();
        timers.arm_countdown(ms(0), ms(1000));
        timers.freeze.arm(ms(0), ms(5000));
        timers.arm_spawn(FoodKind::Bonus, ms(0), ms(5000));

        timers.stop_all();
        assert!(!timers.wants_frame());
        assert!(!timers.has_countdown());
        assert!(timers.freeze.is_idle());
        assert_eq!(timers.pending_spawns(), 0);
        assert_eq!(timers.stats().live_countdowns(), 0);
    }
}

//! Time management utilities
//!
//! All timing in the runtime is driven by a frame clock owned by the scene.
//! Nothing here reads the wall clock, so a frame hitch or a paused tab only
//! shows up as a large `dt` handed to `FrameClock::advance`.

/// Scene timestamp in seconds since the clock started
pub type Timestamp = f64;

/// Monotonic frame clock advanced explicitly by the driver
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    now: Timestamp,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame
    ///
    /// Negative or non-finite deltas are ignored so the clock never runs
    /// backwards.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
        self.frame_count += 1;
    }

    /// Current time in seconds
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Number of frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fire-and-forget timer that fires at most once per schedule
///
/// `schedule` refuses to re-arm while a deadline is pending, which is what
/// lets per-frame code call it unconditionally without stacking timers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OneShotTimer {
    deadline: Option<Timestamp>,
}

impl OneShotTimer {
    /// Create an idle timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` seconds after `now`
    ///
    /// Returns `false` without changing anything if already pending.
    pub fn schedule(&mut self, now: Timestamp, delay: f32) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + f64::from(delay.max(0.0)));
        true
    }

    /// Whether a deadline is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Check whether the timer fired, disarming it if so
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether `now` is before the pending deadline
    pub fn is_running(&self, now: Timestamp) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Lifetime for entities that should despawn after a duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Time when the entity was created
    pub created_at: Timestamp,
    /// How long the entity should live in seconds (<= 0 means forever)
    pub duration: f32,
}

impl Lifetime {
    /// Create a new lifetime
    pub fn new(created_at: Timestamp, duration: f32) -> Self {
        Self {
            created_at,
            duration,
        }
    }

    /// Check if this lifetime has expired
    pub fn is_expired(&self, now: Timestamp) -> bool {
        if self.duration <= 0.0 {
            false
        } else {
            now >= self.created_at + f64::from(self.duration)
        }
    }

    /// Remaining lifetime in seconds
    #[allow(clippy::cast_possible_truncation)]
    pub fn remaining(&self, now: Timestamp) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.created_at + f64::from(self.duration) - now).max(0.0) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ignores_invalid_dt() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        clock.advance(f32::NAN);
        clock.advance(-3.0);
        assert_eq!(clock.now(), 0.5);
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn test_one_shot_latch() {
        let mut timer = OneShotTimer::new();
        assert!(timer.schedule(1.0, 0.5));
        assert!(!timer.schedule(1.2, 0.5));
        assert!(!timer.poll(1.4));
        assert!(timer.is_running(1.4));
        assert!(timer.poll(1.5));
        assert!(!timer.is_pending());
        assert!(!timer.poll(2.0));
    }

    #[test]
    fn test_cancel_allows_reschedule() {
        let mut timer = OneShotTimer::new();
        timer.schedule(0.0, 1.0);
        timer.cancel();
        assert!(timer.schedule(0.0, 2.0));
        assert!(!timer.poll(1.5));
    }

    #[test]
    fn test_lifetime_expired() {
        let lifetime = Lifetime::new(0.0, 5.0);
        assert!(!lifetime.is_expired(2.0));
        assert!(lifetime.is_expired(5.0));
    }

    #[test]
    fn test_infinite_lifetime() {
        let lifetime = Lifetime::new(0.0, 0.0);
        assert!(!lifetime.is_expired(1000.0));
        assert!(lifetime.remaining(1000.0).is_infinite());
    }

    #[test]
    fn test_remaining_time() {
        let lifetime = Lifetime::new(0.0, 10.0);
        assert_eq!(lifetime.remaining(3.0), 7.0);
        assert_eq!(lifetime.remaining(12.0), 0.0);
    }
}

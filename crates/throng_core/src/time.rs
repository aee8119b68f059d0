//! Animation Time
//!
//! Throng runs on a single logical timeline: a global tick counter that
//! advances once per update cycle and never resets during a session.
//!
//! - [`Ticks`]: the global counter type
//! - [`FrameClock`]: an immutable snapshot of the timeline (ticks + seconds),
//!   passed explicitly into every mutator and evaluation call
//! - [`TickClock`]: the advancing clock owned by the Sink

/// Global tick counter. Monotonic, never reset during a session.
pub type Ticks = u64;

/// Number of ticks per second of animation time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Fixed-point scale of the playback speed (`speed_raw = speed * 10`).
pub const SPEED_SCALE: u32 = 10;

/// Converts seconds into whole ticks (truncating, like the GPU path).
#[inline]
#[must_use]
pub fn seconds_to_ticks(seconds: f32) -> u32 {
    if seconds <= 0.0 {
        return 0;
    }
    (seconds * TICKS_PER_SECOND as f32) as u32
}

/// Converts a tick count into seconds.
#[inline]
#[must_use]
pub fn ticks_to_seconds(ticks: Ticks) -> f32 {
    ticks as f32 / TICKS_PER_SECOND as f32
}

/// Snapshot of the global timeline for one update cycle.
///
/// `ticks` drives clip playback; `seconds` drives cross-fade progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    pub ticks: Ticks,
    pub seconds: f32,
}

impl FrameClock {
    #[inline]
    #[must_use]
    pub const fn new(ticks: Ticks, seconds: f32) -> Self {
        Self { ticks, seconds }
    }

    /// A snapshot whose seconds are derived from the tick count.
    #[inline]
    #[must_use]
    pub fn from_ticks(ticks: Ticks) -> Self {
        Self {
            ticks,
            seconds: ticks_to_seconds(ticks),
        }
    }
}

/// Advancing global clock.
///
/// Fractional ticks are carried across updates so that the tick count
/// stays in step with the accumulated seconds.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    ticks: Ticks,
    seconds: f32,
    carry: f32,
}

impl TickClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `dt` seconds. Negative deltas are ignored.
    pub fn advance(&mut self, dt: f32) -> FrameClock {
        if dt > 0.0 {
            self.seconds += dt;
            let exact = dt * TICKS_PER_SECOND as f32 + self.carry;
            let whole = exact.floor();
            self.carry = exact - whole;
            self.ticks += whole as Ticks;
        }
        self.now()
    }

    #[inline]
    #[must_use]
    pub fn ticks(&self) -> Ticks {
        self.ticks
    }

    #[inline]
    #[must_use]
    pub fn now(&self) -> FrameClock {
        FrameClock::new(self.ticks, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_clock_carries_fractional_ticks() {
        let mut clock = TickClock::new();
        // 1/128 s is 0.46875 ticks at 60 ticks per second.
        clock.advance(1.0 / 128.0);
        clock.advance(1.0 / 128.0);
        assert_eq!(clock.ticks(), 0);
        clock.advance(1.0 / 128.0);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn tick_clock_ignores_negative_delta() {
        let mut clock = TickClock::new();
        clock.advance(1.0);
        let before = clock.now();
        clock.advance(-0.5);
        assert_eq!(clock.now(), before);
    }

    #[test]
    fn seconds_to_ticks_truncates() {
        assert_eq!(seconds_to_ticks(0.0), 0);
        assert_eq!(seconds_to_ticks(-3.0), 0);
        assert_eq!(seconds_to_ticks(1.0), TICKS_PER_SECOND);
        assert_eq!(seconds_to_ticks(0.5), TICKS_PER_SECOND / 2);
    }
}

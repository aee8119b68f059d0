//! Per-instance tick arithmetic.
//!
//! The GPU evaluator and the CPU fallback share these formulas exactly:
//!
//! ```text
//! elapsed = ((now - tick_start) * speed_raw) / SPEED_SCALE + offset_ticks
//! phase   = elapsed % len                 (looping)
//! phase   = min(elapsed, len - 1)         (play once)
//! t       = phase / len
//! ```

use throng_core::{Result, SPEED_SCALE, ThrongError, Ticks};

/// Converts a playback speed into the fixed-point representation stored in
/// the instance buffer.
///
/// Zero freezes the pose. Negative and non-finite speeds are rejected.
pub fn speed_to_raw(speed: f32) -> Result<u32> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(ThrongError::InvalidPlaybackSpeed(speed));
    }
    Ok((speed * SPEED_SCALE as f32).round() as u32)
}

#[inline]
#[must_use]
pub fn raw_to_speed(raw: u32) -> f32 {
    raw as f32 / SPEED_SCALE as f32
}

/// Wraps (looping) or clamps (play once) an elapsed tick count into a clip
/// of `tick_length` ticks. Play-once clamps to the last tick, `len - 1`.
pub fn tick_phase(elapsed: u64, tick_length: u32, looping: bool) -> Result<u64> {
    if tick_length == 0 {
        return Err(ThrongError::ZeroTickLength);
    }
    let len = u64::from(tick_length);
    Ok(if looping {
        elapsed % len
    } else if elapsed >= len {
        len - 1
    } else {
        elapsed
    })
}

/// Playback state shared by every animation slot of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackClock {
    /// Global tick at which the current playback was anchored.
    pub tick_start: Ticks,
    /// Playback speed, fixed point scaled by [`SPEED_SCALE`].
    pub speed_raw: u32,
    pub looping: bool,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self {
            tick_start: 0,
            speed_raw: SPEED_SCALE,
            looping: true,
        }
    }
}

impl PlaybackClock {
    #[must_use]
    pub fn new(tick_start: Ticks, speed_raw: u32, looping: bool) -> Self {
        Self {
            tick_start,
            speed_raw,
            looping,
        }
    }

    /// Ticks of clip time elapsed at global tick `now` for a slot anchored
    /// at `offset_ticks`.
    #[inline]
    #[must_use]
    pub fn elapsed_ticks(&self, now: Ticks, offset_ticks: u32) -> u64 {
        let scaled = now
            .saturating_sub(self.tick_start)
            .saturating_mul(u64::from(self.speed_raw))
            / u64::from(SPEED_SCALE);
        scaled.saturating_add(u64::from(offset_ticks))
    }

    pub fn phase(&self, now: Ticks, offset_ticks: u32, tick_length: u32) -> Result<u64> {
        tick_phase(self.elapsed_ticks(now, offset_ticks), tick_length, self.looping)
    }

    /// Normalized time in `[0, 1)` used to index keyframe tracks.
    pub fn normalized_time(&self, now: Ticks, offset_ticks: u32, tick_length: u32) -> Result<f32> {
        let phase = self.phase(now, offset_ticks, tick_length)?;
        Ok(phase as f32 / tick_length as f32)
    }
}

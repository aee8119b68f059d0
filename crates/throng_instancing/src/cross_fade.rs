//! Timed transition state between two animations.

use throng_core::ClipId;

/// An in-flight cross-fade. Exists only while fading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    target: ClipId,
    start_seconds: f32,
    duration: f32,
}

impl CrossFade {
    #[must_use]
    pub fn new(target: ClipId, start_seconds: f32, duration: f32) -> Self {
        Self {
            target,
            start_seconds,
            duration,
        }
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> ClipId {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn start_seconds(&self) -> f32 {
        self.start_seconds
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Linear progress in `[0, 1]` at `now_seconds`. A zero duration is
    /// complete immediately.
    #[must_use]
    pub fn progress(&self, now_seconds: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now_seconds - self.start_seconds) / self.duration).clamp(0.0, 1.0)
    }

    #[inline]
    #[must_use]
    pub fn is_complete(&self, now_seconds: f32) -> bool {
        self.progress(now_seconds) >= 1.0
    }
}

/// Result of one cross-fade refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossFadeStatus {
    /// No fade was running.
    Idle,
    /// Still fading; carries the new blend factor.
    Fading(f32),
    /// The fade finished during this refresh and B was promoted into A.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_and_monotonic() {
        let fade = CrossFade::new(ClipId::new(1), 2.0, 0.5);
        assert!(fade.progress(1.0).abs() < f32::EPSILON);
        assert!((fade.progress(2.25) - 0.5).abs() < 1e-5);
        assert!((fade.progress(10.0) - 1.0).abs() < f32::EPSILON);

        let mut last = 0.0;
        for step in 0..40 {
            let p = fade.progress(2.0 + step as f32 * 0.02);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let fade = CrossFade::new(ClipId::new(1), 5.0, 0.0);
        assert!(fade.is_complete(5.0));
    }
}

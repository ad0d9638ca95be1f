//! The single assembled/dispersed blend scalar shared by every formation field

use super::easing::{chase_factor, ease_out_cubic};

/// How quickly progress chases its target, per second
pub const PROGRESS_RATE: f32 = 1.5;

/// Global formation progress: 0.0 = dispersed cloud, 1.0 = assembled tree.
///
/// Flipping the target mid-flight only changes what the smoothing chases, so
/// the value never jumps and never leaves [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationProgress {
    value: f32,
}

impl FormationProgress {
    /// Start at rest in the given state
    pub fn new(formed: bool) -> Self {
        Self {
            value: if formed { 1.0 } else { 0.0 },
        }
    }

    /// Advance toward the target by one frame
    pub fn update(&mut self, formed: bool, dt: f32) {
        let target = if formed { 1.0 } else { 0.0 };
        let step = chase_factor(PROGRESS_RATE, dt);
        self.value = (self.value + (target - self.value) * step).clamp(0.0, 1.0);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Cubic ease-out of the raw progress, used to blend particle positions
    pub fn eased(&self) -> f32 {
        ease_out_cubic(self.value)
    }

    /// Largest change a single update of length `dt` can make
    pub fn max_step(dt: f32) -> f32 {
        chase_factor(PROGRESS_RATE, dt)
    }

    /// Force a value, clamped to [0, 1]
    pub fn set(&mut self, value: f32) {
        self.value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_converges_within_bounded_steps() {
        let mut progress = FormationProgress::new(false);
        let mut steps = 0;
        while (1.0 - progress.value()) > 1e-3 {
            progress.update(true, DT);
            steps += 1;
            assert!(steps <= 300, "did not converge in 300 steps");
        }
    }

    #[test]
    fn test_reversal_stays_in_range() {
        let mut progress = FormationProgress::new(false);
        for _ in 0..40 {
            progress.update(true, DT);
        }
        let mid = progress.value();
        assert!(mid > 0.0 && mid < 1.0);

        for _ in 0..400 {
            let before = progress.value();
            progress.update(false, DT);
            assert!(progress.value() <= before);
            assert!(progress.value() >= 0.0);
        }
    }

    #[test]
    fn test_huge_dt_lands_on_target_without_overshoot() {
        let mut progress = FormationProgress::new(false);
        progress.update(true, 5.0);
        assert_eq!(progress.value(), 1.0);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut progress = FormationProgress::new(true);
        progress.update(false, f32::NAN);
        progress.update(false, -0.5);
        assert_eq!(progress.value(), 1.0);
    }

    #[test]
    fn test_set_clamps() {
        let mut progress = FormationProgress::new(false);
        progress.set(2.0);
        assert_eq!(progress.value(), 1.0);
        progress.set(f32::NAN);
        assert_eq!(progress.value(), 0.0);
    }
}

//! Five-stop color ramp shared by the foliage and the ornaments
//!
//! Both the point cloud and the ornament instances go through
//! [`GradientRamp::evaluate`] and [`gradient_t_for_height`], so the two
//! always agree on which color belongs at which height.

use super::Color;

/// Number of stops in a ramp. Stop 0 is the top of the tree, stop 4 the bottom.
pub const STOP_COUNT: usize = 5;

/// World height mapped to the top of the ramp
const RAMP_TOP_Y: f32 = 10.0;
/// Vertical span covered by the ramp, ending at `RAMP_TOP_Y - RAMP_SPAN`
const RAMP_SPAN: f32 = 14.0;

/// Ordered color stops from top to bottom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientRamp {
    stops: [Color; STOP_COUNT],
}

impl Default for GradientRamp {
    /// Red, gold, emerald, blue, purple
    fn default() -> Self {
        Self::new([
            Color::new(0.937, 0.267, 0.267),
            Color::new(0.984, 0.749, 0.141),
            Color::new(0.063, 0.725, 0.506),
            Color::new(0.231, 0.510, 0.965),
            Color::new(0.545, 0.361, 0.965),
        ])
    }
}

impl GradientRamp {
    pub fn new(stops: [Color; STOP_COUNT]) -> Self {
        Self { stops }
    }

    /// Build a ramp from exactly five hex strings
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, String> {
        if colors.len() != STOP_COUNT {
            return Err(format!(
                "Gradient needs exactly {} colors, got {}",
                STOP_COUNT,
                colors.len()
            ));
        }

        let mut stops = [Color::BLACK; STOP_COUNT];
        for (stop, hex) in stops.iter_mut().zip(colors) {
            *stop = Color::from_hex(hex.as_ref())?;
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[Color; STOP_COUNT] {
        &self.stops
    }

    pub fn stop(&self, index: usize) -> Color {
        self.stops[index.min(STOP_COUNT - 1)]
    }

    /// Color at position `t` along the ramp (0 = top stop, 1 = bottom stop).
    ///
    /// `t` is clamped to [0, 1]; NaN reads as the top. Anything at or past
    /// the end returns the last stop itself rather than indexing beyond it.
    pub fn evaluate(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (STOP_COUNT - 1) as f32;
        let index = scaled.floor() as usize;

        if index >= STOP_COUNT - 1 {
            return self.stops[STOP_COUNT - 1];
        }

        let mix = scaled - index as f32;
        self.stops[index].lerp(&self.stops[index + 1], mix)
    }

    /// Ramp color for a resting world height
    pub fn color_at_height(&self, y: f32) -> Color {
        self.evaluate(gradient_t_for_height(y))
    }
}

/// Map a world height to a ramp position: high points read the top stops,
/// low points the bottom ones.
pub fn gradient_t_for_height(y: f32) -> f32 {
    let h = (y - (RAMP_TOP_Y - RAMP_SPAN)) / RAMP_SPAN;
    1.0 - h.clamp(0.0, 1.0)
}

//! Easing curves for the formation blend and sparkle shaping

/// Cubic ease-out: fast start, gentle landing. Input is clamped to [0, 1].
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Hermite step between two edges, 0 below `edge0` and 1 above `edge1`
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fraction of the remaining distance to cover this frame when chasing a
/// target at `rate` per second. Bad frame deltas read as "no time passed".
pub fn chase_factor(rate: f32, dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    (dt * rate).clamp(0.0, 1.0)
}

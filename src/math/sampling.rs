//! Uniform volume sampling for seeding particle layouts

use rand::Rng;
use std::f32::consts::TAU;

use super::Vec3;

/// Uniform point inside a sphere of the given radius.
///
/// The radius is drawn through a cube root so points fill the volume evenly
/// instead of bunching up near the center.
pub fn sample_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = radius * rng.gen::<f32>().cbrt();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Point inside an upright cone of `height` whose base radius is
/// `base_radius`, centered vertically so y spans `[-height/2, height/2]`.
///
/// Each slice is sampled uniformly over its disk; the height itself is drawn
/// uniformly, which stacks slightly more points toward the narrow tip than a
/// strict volume sample would. That is the look the foliage is tuned for.
pub fn sample_cone<R: Rng + ?Sized>(rng: &mut R, height: f32, base_radius: f32) -> Vec3 {
    let h = rng.gen::<f32>() * height;
    let slice_radius = if height > 0.0 {
        base_radius * (1.0 - h / height)
    } else {
        0.0
    };
    let r = slice_radius * rng.gen::<f32>().sqrt();
    let theta = rng.gen::<f32>() * TAU;

    Vec3::new(r * theta.cos(), h - height / 2.0, r * theta.sin())
}

//! Cursor-attracted magic dust
//!
//! Free particles that drift, get pulled toward the pointer when it comes
//! close, and bleed off speed through friction. Independent of the tree's
//! formation state.

use rand::Rng;

use crate::color::Color;
use crate::math::Vec3;

pub const DUST_COUNT: usize = 400;

const ATTRACT_RADIUS: f32 = 8.0;
const ATTRACT_STRENGTH: f32 = 0.06;
const FRICTION: f32 = 0.95;
/// Particles past this on x or y are recycled
const BOUND: f32 = 15.0;
const MAX_DRIFT: f32 = 0.0025;

/// A single dust mote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DustParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Constant drift added to velocity every frame
    pub acceleration: Vec3,
}

impl DustParticle {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 20.0,
            (rng.gen::<f32>() - 0.5) * 15.0 + 5.0,
            (rng.gen::<f32>() - 0.5) * 10.0,
        );
        let acceleration = Vec3::new(
            rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
            rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
            rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
        );

        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration,
        }
    }

    /// Put the mote back near the top of the trunk, at rest
    fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 5.0,
            (rng.gen::<f32>() - 0.5) * 5.0 + 5.0,
            (rng.gen::<f32>() - 0.5) * 5.0,
        );
        self.velocity = Vec3::ZERO;
    }

    fn out_of_bounds(&self) -> bool {
        self.position.x.abs() > BOUND || self.position.y.abs() > BOUND
    }
}

/// Velocity kick toward the cursor for a mote offset by `to_cursor` from it.
///
/// Falls off linearly from full strength at the cursor to nothing at the
/// interaction radius. Non-finite distances pull nothing.
pub fn attraction(to_cursor: Vec3) -> Vec3 {
    let dist = to_cursor.length();
    if !dist.is_finite() || dist >= ATTRACT_RADIUS {
        return Vec3::ZERO;
    }
    let force = ATTRACT_STRENGTH * (1.0 - dist / ATTRACT_RADIUS);
    to_cursor.scale(force)
}

/// System managing the dust motes
pub struct DustField {
    particles: Vec<DustParticle>,
    positions: Vec<f32>,
    color: Color,
}

impl DustField {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, color: Color) -> Self {
        let particles = (0..count).map(|_| DustParticle::random(rng)).collect();
        Self::from_particles(particles, color)
    }

    pub fn from_particles(particles: Vec<DustParticle>, color: Color) -> Self {
        let mut field = Self {
            positions: vec![0.0; particles.len() * 3],
            particles,
            color,
        };
        field.write_positions();
        field
    }

    /// Step every mote one frame toward the cursor at `(target_x, target_y, 0)`.
    ///
    /// Motes that started the frame outside the bounds are respawned with zero
    /// velocity; their drift is kept.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, target_x: f32, target_y: f32) {
        let target = Vec3::new(target_x, target_y, 0.0);

        for p in &mut self.particles {
            let escaped = p.out_of_bounds();

            p.velocity += p.acceleration;
            p.velocity += attraction(target - p.position);
            p.velocity *= FRICTION;
            p.position += p.velocity;

            if escaped {
                p.respawn(rng);
            }
        }

        self.write_positions();
    }

    fn write_positions(&mut self) {
        for (i, p) in self.particles.iter().enumerate() {
            self.positions[i * 3..i * 3 + 3].copy_from_slice(&p.position.to_array());
        }
    }

    /// Flat xyz positions, 3 floats per mote
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn particles(&self) -> &[DustParticle] {
        &self.particles
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(position: Vec3) -> DustParticle {
        DustParticle {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        }
    }

    #[test]
    fn test_attraction_profile() {
        assert_eq!(attraction(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(attraction(Vec3::new(8.0, 0.0, 0.0)), Vec3::ZERO);
        assert_eq!(attraction(Vec3::new(0.0, 20.0, 0.0)), Vec3::ZERO);
        assert_eq!(attraction(Vec3::new(f32::NAN, 0.0, 0.0)), Vec3::ZERO);

        let half = attraction(Vec3::new(4.0, 0.0, 0.0));
        assert!((half.x - 4.0 * 0.03).abs() < 1e-6);

        // Force coefficient is largest close in
        let near = attraction(Vec3::new(0.5, 0.0, 0.0)).x / 0.5;
        let far = attraction(Vec3::new(7.0, 0.0, 0.0)).x / 7.0;
        assert!(near > far);
    }

    #[test]
    fn test_initial_ranges() {
        let mut rng = StdRng::seed_from_u64(17);
        let field = DustField::new(&mut rng, 400, Color::WHITE);
        assert_eq!(field.positions().len(), 1200);
        for p in field.particles() {
            assert!(p.position.x.abs() <= 10.0);
            assert!(p.position.y >= -2.5 && p.position.y <= 12.5);
            assert!(p.position.z.abs() <= 5.0);
            assert!(p.acceleration.x.abs() <= MAX_DRIFT);
            assert_eq!(p.velocity, Vec3::ZERO);
        }
    }

    #[test]
    fn test_friction_and_drift() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = still(Vec3::new(0.0, 5.0, 0.0));
        p.acceleration = Vec3::new(0.002, 0.0, 0.0);
        // Cursor far away so only drift acts
        let mut field = DustField::from_particles(vec![p], Color::WHITE);
        field.update(&mut rng, 100.0, 100.0);

        let v = field.particles()[0].velocity;
        assert!((v.x - 0.002 * 0.95).abs() < 1e-7);
        assert!((field.particles()[0].position.x - v.x).abs() < 1e-7);
    }

    #[test]
    fn test_pulled_toward_cursor() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = DustField::from_particles(vec![still(Vec3::new(3.0, 2.0, 0.0))], Color::WHITE);
        for _ in 0..30 {
            field.update(&mut rng, 0.0, 2.0);
        }
        assert!(field.particles()[0].position.x.abs() < 3.0);
    }

    #[test]
    fn test_escaped_particle_is_recycled() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut escaped = still(Vec3::new(16.0, 0.0, 0.0));
        escaped.velocity = Vec3::new(1.0, 1.0, 1.0);
        escaped.acceleration = Vec3::new(0.001, 0.001, 0.001);
        let mut high = still(Vec3::new(0.0, -20.0, 3.0));
        high.velocity = Vec3::new(0.0, -2.0, 0.0);

        let mut field = DustField::from_particles(vec![escaped, high], Color::WHITE);
        field.update(&mut rng, 0.0, 0.0);

        for p in field.particles() {
            assert!(p.position.x >= -2.5 && p.position.x <= 2.5);
            assert!(p.position.y >= 2.5 && p.position.y <= 7.5);
            assert_eq!(p.velocity, Vec3::ZERO);
        }
        // Drift survives the recycle
        assert_eq!(field.particles()[0].acceleration, Vec3::new(0.001, 0.001, 0.001));
    }

    #[test]
    fn test_in_bounds_particles_are_not_recycled() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut field = DustField::from_particles(vec![still(Vec3::new(14.0, -14.0, 0.0))], Color::WHITE);
        field.update(&mut rng, 100.0, 100.0);
        assert_eq!(field.particles()[0].position, Vec3::new(14.0, -14.0, 0.0));
    }

    #[test]
    fn test_population_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = DustField::new(&mut rng, 400, Color::WHITE);
        let mut seed_rng = StdRng::seed_from_u64(6);
        for frame in 0..2000 {
            let t = frame as f32 * 0.01;
            field.update(&mut seed_rng, 6.0 * t.sin(), 4.0 * t.cos());
        }
        assert_eq!(field.len(), 400);
        assert!(field.positions().iter().all(|v| v.is_finite()));
    }
}

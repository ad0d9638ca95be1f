//! Foliage point cloud
//!
//! Thousands of needle points, each with a fixed spot in the dispersed cloud
//! and a fixed spot on the assembled cone. Nothing per-particle changes over
//! time: every frame is a pure function of the shared progress, the clock,
//! and the time of the last gradient change.

use rand::Rng;

use crate::animation::{smoothstep, FormationProgress};
use crate::color::{gradient_t_for_height, Color, GradientRamp};
use crate::math::{sample_cone, sample_sphere, Vec3};

pub const FOLIAGE_COUNT: usize = 6000;

const CHAOS_RADIUS: f32 = 12.0;
const CONE_HEIGHT: f32 = 14.0;
const CONE_RADIUS: f32 = 5.0;
const CONE_DROP: f32 = 3.0;

/// Above this progress the assembled tree sways in the wind
const WIND_THRESHOLD: f32 = 0.8;
/// Below this progress the loose cloud bobs gently
const IDLE_THRESHOLD: f32 = 0.2;

/// Ripple sweep after a gradient change
const RIPPLE_DURATION: f32 = 2.0;
const RIPPLE_START_Y: f32 = 10.0;
const RIPPLE_SPEED: f32 = 20.0;
const RIPPLE_PEAK: f32 = 0.8;
const RIPPLE_PUSH: f32 = 0.3;

/// A single needle point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageParticle {
    pub chaos_position: Vec3,
    pub target_position: Vec3,
    /// Uniform [0, 1), drives idle bobbing and sparkle timing
    pub random_phase: f32,
    /// Uniform [0.5, 1.0], point size multiplier
    pub size_factor: f32,
}

impl FoliageParticle {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let chaos_position = sample_sphere(rng, CHAOS_RADIUS);
        let mut target_position = sample_cone(rng, CONE_HEIGHT, CONE_RADIUS);
        target_position.y -= CONE_DROP;

        Self {
            chaos_position,
            target_position,
            random_phase: rng.gen::<f32>(),
            size_factor: rng.gen_range(0.5..=1.0),
        }
    }
}

/// Rendered state of one needle for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageSample {
    pub position: Vec3,
    pub color: Color,
    pub alpha: f32,
}

/// Brightening from the ripple band at height `y`, `since` seconds after a
/// gradient change. Exactly zero outside `[0, RIPPLE_DURATION)`.
pub fn ripple_strength(y: f32, since: f32) -> f32 {
    if !(0.0..RIPPLE_DURATION).contains(&since) {
        return 0.0;
    }
    let wave_y = RIPPLE_START_Y - since * RIPPLE_SPEED;
    let d = y - wave_y;
    (-0.5 * d * d).exp() * RIPPLE_PEAK
}

/// The foliage formation field
pub struct FoliageField {
    particles: Vec<FoliageParticle>,
    progress: FormationProgress,
    last_color_change: Option<f32>,
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl FoliageField {
    /// Seed `count` needles
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, formed: bool) -> Self {
        let particles = (0..count).map(|_| FoliageParticle::random(rng)).collect();
        Self::from_particles(particles, formed)
    }

    pub fn from_particles(particles: Vec<FoliageParticle>, formed: bool) -> Self {
        let n = particles.len();
        let sizes = particles.iter().map(|p| p.size_factor).collect();
        let mut field = Self {
            particles,
            progress: FormationProgress::new(formed),
            last_color_change: None,
            positions: vec![0.0; n * 3],
            colors: vec![0.0; n * 4],
            sizes,
        };
        // Buffers hold the resting layout until the first frame
        for (i, p) in field.particles.iter().enumerate() {
            let rest = if formed { p.target_position } else { p.chaos_position };
            field.positions[i * 3..i * 3 + 3].copy_from_slice(&rest.to_array());
        }
        field
    }

    /// Start the ripple sweep. Call once per gradient change, with that frame's time.
    pub fn mark_color_change(&mut self, time: f32) {
        self.last_color_change = Some(time);
    }

    pub fn last_color_change(&self) -> Option<f32> {
        self.last_color_change
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn set_progress(&mut self, value: f32) {
        self.progress.set(value);
    }

    /// Advance progress toward the target and rebuild the render buffers
    pub fn update(&mut self, formed: bool, dt: f32, time: f32, ramp: &GradientRamp) {
        self.progress.update(formed, dt);

        for i in 0..self.particles.len() {
            let sample = self.sample(i, time, ramp);
            self.positions[i * 3..i * 3 + 3].copy_from_slice(&sample.position.to_array());
            let c = &mut self.colors[i * 4..i * 4 + 4];
            c[0] = sample.color.r;
            c[1] = sample.color.g;
            c[2] = sample.color.b;
            c[3] = sample.alpha;
        }
    }

    /// Compute one needle's rendered position, color and alpha at the current progress.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn sample(&self, index: usize, time: f32, ramp: &GradientRamp) -> FoliageSample {
        let p = &self.particles[index];
        let progress = self.progress.value();

        let mut pos = p.chaos_position.lerp(&p.target_position, self.progress.eased());

        if progress > WIND_THRESHOLD {
            let wind = (time * 2.0 + pos.y * 0.5 + pos.x).sin() * 0.08;
            pos.x += wind;
            pos.z += wind * 0.5;
        }

        if progress < IDLE_THRESHOLD {
            pos.y += (time + p.random_phase * 10.0).sin() * 0.1;
        }

        let ripple = match self.last_color_change {
            Some(changed_at) => ripple_strength(pos.y, time - changed_at),
            None => 0.0,
        };
        if ripple > 0.0 {
            if let Some(outward) = pos.try_normalize() {
                pos += outward.scale(ripple * RIPPLE_PUSH);
            }
        }

        let base = ramp.evaluate(gradient_t_for_height(p.target_position.y));
        let sparkle = (time * 4.0 + p.random_phase * 50.0).sin();
        let sparkle_boost = smoothstep(0.8, 1.0, sparkle) * 0.5;

        FoliageSample {
            position: pos,
            color: base.brighten(ripple + sparkle_boost),
            alpha: 0.8 + 0.2 * sparkle,
        }
    }

    /// Flat xyz positions, 3 floats per needle
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat rgba colors, 4 floats per needle
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Point size multipliers, 1 float per needle
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn particles(&self) -> &[FoliageParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

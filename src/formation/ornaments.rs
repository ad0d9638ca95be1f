//! Ornament instances: boxes, fins and spheres hung on the tree
//!
//! Unlike the foliage, each ornament carries its own position and settles
//! toward its destination at its own rate, so the tree assembles in a
//! staggered wave instead of all at once.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::animation::chase_factor;
use crate::color::{Color, GradientRamp};
use crate::math::{sample_sphere, Mat4, Vec3};

pub const ORNAMENT_COUNT: usize = 250;

const CHAOS_RADIUS: f32 = 16.0;
const PROFILE_HEIGHT: f32 = 12.0;
const PROFILE_TAPER: f32 = 13.0;
const PROFILE_BASE_RADIUS: f32 = 4.5;
const PROFILE_OFFSET: f32 = 0.3;
const PROFILE_DROP: f32 = 9.0;

/// Per-frame lerp weights are tuned for 60 fps
const SETTLE_FRAME_RATE: f32 = 60.0;

/// Ornament shape class, each rendered as its own instanced batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    /// Gift box spinning about the vertical axis
    Box,
    /// Flat fin facing the trunk with a small roll
    Fin,
    /// Sphere tumbling about two axes
    Sphere,
}

impl OrnamentKind {
    pub const ALL: [OrnamentKind; 3] = [OrnamentKind::Box, OrnamentKind::Fin, OrnamentKind::Sphere];

    /// Weighted draw: 45% box, 45% fin, 10% sphere
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll = rng.gen::<f32>();
        if roll < 0.45 {
            OrnamentKind::Box
        } else if roll < 0.90 {
            OrnamentKind::Fin
        } else {
            OrnamentKind::Sphere
        }
    }

    pub fn index(self) -> usize {
        match self {
            OrnamentKind::Box => 0,
            OrnamentKind::Fin => 1,
            OrnamentKind::Sphere => 2,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            OrnamentKind::Box => "box",
            OrnamentKind::Fin => "fin",
            OrnamentKind::Sphere => "sphere",
        }
    }

    /// Orientation at `time` for an ornament at `position`
    fn rotation(self, position: Vec3, chaos: Vec3, time: f32) -> Mat4 {
        match self {
            OrnamentKind::Fin => {
                let trunk = Vec3::new(0.0, position.y, 0.0);
                let roll = (time * 4.0 + chaos.y).sin() * 0.1;
                Mat4::face_towards(position, trunk, Vec3::UP)
                    .mul(&Mat4::rotation_y(-FRAC_PI_2))
                    .mul(&Mat4::rotation_z(roll))
            }
            OrnamentKind::Box => Mat4::rotation_y(time * 0.5 + chaos.z),
            OrnamentKind::Sphere => Mat4::euler_xyz(time, time, 0.0),
        }
    }
}

/// A single ornament instance
#[derive(Debug, Clone, PartialEq)]
pub struct Ornament {
    pub chaos_position: Vec3,
    pub target_position: Vec3,
    /// Uniform [0.4, 0.8]
    pub scale_factor: f32,
    /// Uniform [0.02, 0.12], fraction of the gap closed per 60 fps frame
    pub settle_weight: f32,
    pub kind: OrnamentKind,
    pub current_position: Vec3,
    pub color: Color,
}

impl Ornament {
    fn random<R: Rng + ?Sized>(rng: &mut R, ramp: &GradientRamp) -> Self {
        let chaos_position = sample_sphere(rng, CHAOS_RADIUS);

        let h = rng.gen::<f32>() * PROFILE_HEIGHT;
        let radius = PROFILE_BASE_RADIUS * (1.0 - h / PROFILE_TAPER) + PROFILE_OFFSET;
        let theta = rng.gen::<f32>() * TAU;
        let target_position = Vec3::new(
            radius * theta.cos(),
            h - PROFILE_DROP,
            radius * theta.sin(),
        );

        let kind = OrnamentKind::random(rng);

        Self {
            chaos_position,
            target_position,
            scale_factor: rng.gen_range(0.4..=0.8),
            settle_weight: rng.gen_range(0.02..=0.12),
            kind,
            current_position: chaos_position,
            color: ramp.color_at_height(target_position.y),
        }
    }

    /// Move one frame closer to the destination for the given formation target
    fn settle(&mut self, formed: bool, dt: f32) {
        let destination = if formed { self.target_position } else { self.chaos_position };
        let step = chase_factor(self.settle_weight * SETTLE_FRAME_RATE, dt);
        self.current_position = self.current_position.lerp(&destination, step);
    }

    /// Instance transform for this frame. The bob is visual only.
    pub fn transform(&self, progress: f32, time: f32) -> Mat4 {
        let bob = (time * 2.0 + self.chaos_position.x).sin() * 0.1;
        let position = self.current_position.with_y(self.current_position.y + bob);
        let scale = self.scale_factor * (0.5 + 0.5 * progress);
        let rotation = self.kind.rotation(position, self.chaos_position, time);
        Mat4::compose(position, &rotation, scale)
    }
}

/// One fixed-size render batch per ornament kind
#[derive(Debug, Clone)]
pub struct OrnamentBatch {
    pub kind: OrnamentKind,
    /// Indices into the ornament list, in instance order
    members: Vec<usize>,
    /// 16 floats per instance, column-major
    matrices: Vec<f32>,
    /// 3 floats per instance
    colors: Vec<f32>,
}

impl OrnamentBatch {
    fn new(kind: OrnamentKind, members: Vec<usize>) -> Self {
        let n = members.len();
        Self {
            kind,
            members,
            matrices: vec![0.0; n * 16],
            colors: vec![0.0; n * 3],
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn matrices(&self) -> &[f32] {
        &self.matrices
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }
}

/// The ornament formation field
pub struct OrnamentField {
    ornaments: Vec<Ornament>,
    batches: [OrnamentBatch; 3],
}

impl OrnamentField {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, ramp: &GradientRamp) -> Self {
        let ornaments = (0..count).map(|_| Ornament::random(rng, ramp)).collect();
        Self::from_ornaments(ornaments)
    }

    /// Build from explicit ornaments; batch sizes are fixed from here on
    pub fn from_ornaments(ornaments: Vec<Ornament>) -> Self {
        let members = |kind: OrnamentKind| -> Vec<usize> {
            ornaments
                .iter()
                .enumerate()
                .filter(|(_, o)| o.kind == kind)
                .map(|(i, _)| i)
                .collect()
        };

        let batches = [
            OrnamentBatch::new(OrnamentKind::Box, members(OrnamentKind::Box)),
            OrnamentBatch::new(OrnamentKind::Fin, members(OrnamentKind::Fin)),
            OrnamentBatch::new(OrnamentKind::Sphere, members(OrnamentKind::Sphere)),
        ];

        let mut field = Self { ornaments, batches };
        field.write_colors();
        field
    }

    /// Settle every ornament one frame and rebuild the instance matrices.
    ///
    /// `progress` is the foliage's shared formation progress.
    pub fn update(&mut self, formed: bool, dt: f32, time: f32, progress: f32) {
        for ornament in &mut self.ornaments {
            ornament.settle(formed, dt);
        }

        for batch in &mut self.batches {
            for (slot, &index) in batch.members.iter().enumerate() {
                let m = self.ornaments[index].transform(progress, time);
                batch.matrices[slot * 16..slot * 16 + 16].copy_from_slice(m.as_slice());
            }
        }
    }

    /// Recolor every ornament from its resting height. Only needed when the ramp changes.
    pub fn recolor(&mut self, ramp: &GradientRamp) {
        for ornament in &mut self.ornaments {
            ornament.color = ramp.color_at_height(ornament.target_position.y);
        }
        self.write_colors();
    }

    fn write_colors(&mut self) {
        for batch in &mut self.batches {
            for (slot, &index) in batch.members.iter().enumerate() {
                batch.colors[slot * 3..slot * 3 + 3]
                    .copy_from_slice(&self.ornaments[index].color.to_array());
            }
        }
    }

    pub fn batch(&self, kind: OrnamentKind) -> &OrnamentBatch {
        &self.batches[kind.index()]
    }

    pub fn batches(&self) -> &[OrnamentBatch; 3] {
        &self.batches
    }

    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    pub fn len(&self) -> usize {
        self.ornaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ornaments.is_empty()
    }
}

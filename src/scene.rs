//! Per-frame orchestration of every animated part of the tree
//!
//! `Scene` owns the formation fields, particles and rotation state along with
//! the applied config. Hosts stage changes with `apply_config` (or the
//! setters) and call `advance` once per rendered frame.

use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::color::{Color, GradientRamp};
use crate::data::SceneConfig;
use crate::formation::{FoliageField, OrnamentField, OrnamentKind, FOLIAGE_COUNT, ORNAMENT_COUNT};
use crate::interaction::{
    pointer_to_world, visible_plane, PointerInput, RotationController, ViewPlane,
    DEFAULT_CAMERA_DISTANCE, DEFAULT_FOV_DEGREES,
};
use crate::math::{Mat4, Vec3};
use crate::particles::{CandleRing, DustField, CANDLE_COUNT, DUST_COUNT};

/// Where the star sits at the top of the tree, in tree space
pub const TOPPER_POSITION: Vec3 = Vec3::new(0.0, 5.0, 0.0);
/// Vertical offset of the whole tree group
const SCENE_DROP: f32 = -2.0;

/// One frame's time snapshot, shared by every component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    pub elapsed: f32,
    pub delta: f32,
}

impl FrameClock {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }

    /// Delta with negative or non-finite values read as zero
    pub fn dt(&self) -> f32 {
        if self.delta.is_finite() {
            self.delta.max(0.0)
        } else {
            0.0
        }
    }

    pub fn time(&self) -> f32 {
        if self.elapsed.is_finite() {
            self.elapsed
        } else {
            0.0
        }
    }
}

/// Population sizes for each particle system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCounts {
    pub foliage: usize,
    pub ornaments: usize,
    pub dust: usize,
    pub candles: usize,
}

impl Default for SceneCounts {
    fn default() -> Self {
        Self {
            foliage: FOLIAGE_COUNT,
            ornaments: ORNAMENT_COUNT,
            dust: DUST_COUNT,
            candles: CANDLE_COUNT,
        }
    }
}

pub struct Scene {
    rng: StdRng,
    counts: SceneCounts,
    config: SceneConfig,
    ramp: GradientRamp,
    /// Gradient accepted but not yet shown; applied at the next frame
    pending_ramp: Option<GradientRamp>,
    foliage: FoliageField,
    ornaments: OrnamentField,
    dust: Option<DustField>,
    candles: CandleRing,
    rotation: RotationController,
    view_plane: ViewPlane,
    pointer_ndc: (f32, f32),
    time: f32,
}

impl Scene {
    pub fn new(config: SceneConfig, rng: StdRng) -> Result<Self, String> {
        Self::with_counts(config, SceneCounts::default(), rng)
    }

    pub fn with_counts(config: SceneConfig, counts: SceneCounts, mut rng: StdRng) -> Result<Self, String> {
        config.validate()?;
        let ramp = config.gradient_ramp()?;
        let theme = config.theme()?;

        let foliage = FoliageField::new(&mut rng, counts.foliage, config.is_formed);
        let ornaments = OrnamentField::new(&mut rng, counts.ornaments, &ramp);
        let dust = if config.dust_enabled {
            Some(DustField::new(&mut rng, counts.dust, theme))
        } else {
            None
        };
        let candles = CandleRing::new(&mut rng, counts.candles);

        info!(
            "Scene created: {} foliage, {} ornaments (box {}, fin {}, sphere {}), {} dust, {} candles",
            foliage.len(),
            ornaments.len(),
            ornaments.batch(OrnamentKind::Box).len(),
            ornaments.batch(OrnamentKind::Fin).len(),
            ornaments.batch(OrnamentKind::Sphere).len(),
            dust.as_ref().map_or(0, |d| d.len()),
            candles.candles().len(),
        );

        Ok(Self {
            rng,
            counts,
            config,
            ramp,
            pending_ramp: None,
            foliage,
            ornaments,
            dust,
            candles,
            rotation: RotationController::new(),
            view_plane: ViewPlane::default(),
            pointer_ndc: (0.0, 0.0),
            time: 0.0,
        })
    }

    /// Replace the scene state. Rejected configs leave everything as it was.
    pub fn apply_config(&mut self, config: SceneConfig) -> Result<(), String> {
        if let Err(e) = config.validate() {
            warn!("Rejected scene config: {}", e);
            return Err(e);
        }
        let ramp = config.gradient_ramp()?;
        let theme = config.theme()?;

        if config.is_formed != self.config.is_formed {
            debug!("Formation target -> {}", if config.is_formed { "formed" } else { "dispersed" });
        }

        if config.gradient_colors != self.config.gradient_colors {
            debug!("Gradient changed: {:?}", config.gradient_colors);
            self.pending_ramp = Some(ramp);
        }

        if config.dust_enabled != self.config.dust_enabled {
            debug!("Magic dust {}", if config.dust_enabled { "on" } else { "off" });
            self.dust = if config.dust_enabled {
                Some(DustField::new(&mut self.rng, self.counts.dust, theme))
            } else {
                None
            };
        } else if let Some(dust) = &mut self.dust {
            dust.set_color(theme);
        }

        if config.lights_enabled != self.config.lights_enabled {
            debug!("Lights {}", if config.lights_enabled { "on" } else { "off" });
        }

        self.config = config;
        Ok(())
    }

    fn update_config<F>(&mut self, edit: F) -> Result<(), String>
    where
        F: FnOnce(&mut SceneConfig) -> Result<(), String>,
    {
        let mut next = self.config.clone();
        if let Err(e) = edit(&mut next) {
            warn!("Rejected scene config: {}", e);
            return Err(e);
        }
        self.apply_config(next)
    }

    pub fn set_formed(&mut self, formed: bool) {
        let mut next = self.config.clone();
        next.is_formed = formed;
        self.apply_or_warn(next);
    }

    /// Stored as given; clamped to `[0, 2]` when used
    pub fn set_rotation_speed(&mut self, speed: f32) -> Result<(), String> {
        self.update_config(|c| {
            c.rotation_speed = speed;
            Ok(())
        })
    }

    pub fn set_lights(&mut self, enabled: bool) {
        let mut next = self.config.clone();
        next.lights_enabled = enabled;
        self.apply_or_warn(next);
    }

    pub fn set_dust(&mut self, enabled: bool) {
        let mut next = self.config.clone();
        next.dust_enabled = enabled;
        self.apply_or_warn(next);
    }

    pub fn set_theme_color(&mut self, hex: &str) -> Result<(), String> {
        self.update_config(|c| {
            c.theme_color = hex.to_string();
            Ok(())
        })
    }

    pub fn set_gradient_colors(&mut self, colors: Vec<String>) -> Result<(), String> {
        self.update_config(|c| {
            c.gradient_colors = colors;
            Ok(())
        })
    }

    pub fn set_gradient_color(&mut self, index: usize, hex: &str) -> Result<(), String> {
        self.update_config(|c| c.set_gradient_color(index, hex))
    }

    // Toggles keep a valid config valid; apply_config already logs rejections
    fn apply_or_warn(&mut self, config: SceneConfig) {
        self.apply_config(config).ok();
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        self.rotation.handle(input);
    }

    /// Cursor position in normalized device coordinates, used as the dust target
    pub fn set_pointer_ndc(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer_ndc = (x, y);
        }
    }

    pub fn resize(&mut self, aspect: f32) {
        self.view_plane = visible_plane(DEFAULT_FOV_DEGREES, DEFAULT_CAMERA_DISTANCE, aspect);
    }

    /// Step every component with one shared time snapshot
    pub fn advance(&mut self, clock: FrameClock) {
        let dt = clock.dt();
        let time = clock.time();
        self.time = time;
        let formed = self.config.is_formed;

        if let Some(ramp) = self.pending_ramp.take() {
            self.ramp = ramp;
            self.foliage.mark_color_change(time);
            self.ornaments.recolor(&self.ramp);
        }

        self.foliage.update(formed, dt, time, &self.ramp);
        self.ornaments.update(formed, dt, time, self.foliage.progress());
        self.rotation.update(dt, formed, self.config.effective_rotation_speed());

        if let Some(dust) = &mut self.dust {
            let (tx, ty) = pointer_to_world(self.pointer_ndc.0, self.pointer_ndc.1, &self.view_plane);
            dust.update(&mut self.rng, tx, ty);
        }

        self.candles.update(time, self.config.lights_enabled && formed);
    }

    pub fn progress(&self) -> f32 {
        self.foliage.progress()
    }

    /// Star scale grows with assembly
    pub fn topper_scale(&self) -> f32 {
        self.foliage.progress()
    }

    pub fn topper_matrix(&self) -> Mat4 {
        Mat4::compose(TOPPER_POSITION, &Mat4::identity(), self.topper_scale())
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.angle()
    }

    /// Parent transform of the tree group
    pub fn scene_matrix(&self) -> Mat4 {
        Mat4::translation(0.0, SCENE_DROP, 0.0).mul(&Mat4::rotation_y(self.yaw()))
    }

    pub fn foliage(&self) -> &FoliageField {
        &self.foliage
    }

    pub fn ornaments(&self) -> &OrnamentField {
        &self.ornaments
    }

    /// Dust positions; empty while dust is off
    pub fn dust_positions(&self) -> &[f32] {
        self.dust.as_ref().map(|d| d.positions()).unwrap_or(&[])
    }

    pub fn dust(&self) -> Option<&DustField> {
        self.dust.as_ref()
    }

    pub fn dust_color(&self) -> Color {
        self.dust.as_ref().map_or(Color::BLACK, |d| d.color())
    }

    pub fn candles(&self) -> &CandleRing {
        &self.candles
    }

    pub fn rotation(&self) -> &RotationController {
        &self.rotation
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Gradient currently on screen
    pub fn ramp(&self) -> &GradientRamp {
        &self.ramp
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FormationProgress;
    use crate::color::gradient_t_for_height;
    use crate::interaction::PointerKind;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn small_counts() -> SceneCounts {
        SceneCounts {
            foliage: 1500,
            ornaments: 120,
            dust: 100,
            candles: 30,
        }
    }

    fn scene_with(config: SceneConfig) -> Scene {
        Scene::with_counts(config, small_counts(), StdRng::seed_from_u64(2024)).unwrap()
    }

    fn run(scene: &mut Scene, start: f32, frames: usize) -> f32 {
        let mut t = start;
        for _ in 0..frames {
            t += DT;
            scene.advance(FrameClock::new(t, DT));
        }
        t
    }

    /// Rendered minus base color must be the same sparkle boost on every channel
    fn assert_base_color(rendered: &[f32], base: Color) {
        let boost = rendered[0] - base.r;
        assert!(boost >= -1e-5 && boost <= 0.5 + 1e-5, "boost {}", boost);
        assert!((rendered[1] - base.g - boost).abs() < 1e-5);
        assert!((rendered[2] - base.b - boost).abs() < 1e-5);
    }

    #[test]
    fn test_gradient_follows_height() {
        let mut scene = scene_with(SceneConfig::default());
        run(&mut scene, 0.0, 120);
        assert!((scene.progress() - 1.0).abs() < 1e-3);

        let particles = scene.foliage().particles();
        let (top, _) = particles
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.target_position.y.total_cmp(&b.1.target_position.y))
            .unwrap();
        let (bottom, _) = particles
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.target_position.y.total_cmp(&b.1.target_position.y))
            .unwrap();

        let colors = scene.foliage().colors();
        let ramp = *scene.ramp();

        let purple = Color::from_hex("#8b5cf6").unwrap();
        assert_base_color(&colors[bottom * 4..bottom * 4 + 3], purple);

        let top_y = particles[top].target_position.y;
        assert_base_color(&colors[top * 4..top * 4 + 3], ramp.evaluate(gradient_t_for_height(top_y)));

        // The head of the ramp reads the first stop
        assert_eq!(ramp.color_at_height(10.0), Color::from_hex("#ef4444").unwrap());
    }

    #[test]
    fn test_rapid_toggle_is_continuous() {
        let mut scene = scene_with(SceneConfig::default());
        let bound = FormationProgress::max_step(DT) + 1e-6;
        let mut t = 0.0;
        let mut prev = scene.progress();

        for i in 0..200 {
            scene.set_formed(i % 3 != 0);
            t += DT;
            scene.advance(FrameClock::new(t, DT));
            let p = scene.progress();
            assert!((0.0..=1.0).contains(&p));
            assert!((p - prev).abs() <= bound, "jump {} at frame {}", p - prev, i);
            prev = p;
        }
    }

    #[test]
    fn test_disperse_then_reform() {
        let mut scene = scene_with(SceneConfig::default());
        scene.set_formed(false);
        let t = run(&mut scene, 0.0, 400);
        assert!(scene.progress() < 1e-3);

        scene.set_formed(true);
        run(&mut scene, t, 400);
        assert!(scene.progress() > 1.0 - 1e-3);
    }

    #[test]
    fn test_gradient_change_applies_on_next_frame() {
        let mut scene = scene_with(SceneConfig::default());
        let t = run(&mut scene, 0.0, 10);
        assert_eq!(scene.foliage().last_color_change(), None);

        scene.set_gradient_color(0, "#ffffff").unwrap();
        // Staged only
        assert_eq!(scene.ramp().stop(0), Color::from_hex("#ef4444").unwrap());

        scene.advance(FrameClock::new(t + DT, DT));
        assert_eq!(scene.ramp().stop(0), Color::WHITE);
        assert_eq!(scene.foliage().last_color_change(), Some(t + DT));

        for o in scene.ornaments().ornaments() {
            assert_eq!(o.color, scene.ramp().color_at_height(o.target_position.y));
        }
    }

    #[test]
    fn test_rejected_gradient_keeps_previous() {
        let mut scene = scene_with(SceneConfig::default());
        let before = scene.config().clone();

        assert!(scene.set_gradient_colors(vec!["#ffffff".to_string(); 4]).is_err());
        assert!(scene.set_gradient_color(7, "#ffffff").is_err());
        assert!(scene.set_theme_color("not a color").is_err());
        assert!(scene.set_rotation_speed(f32::NAN).is_err());

        assert_eq!(scene.config(), &before);
        scene.advance(FrameClock::new(0.1, DT));
        assert_eq!(scene.foliage().last_color_change(), None);
    }

    #[test]
    fn test_dust_toggle() {
        let mut scene = scene_with(SceneConfig::default());
        assert_eq!(scene.dust_positions().len(), 300);

        scene.set_dust(false);
        run(&mut scene, 0.0, 5);
        assert!(scene.dust_positions().is_empty());

        scene.set_dust(true);
        assert_eq!(scene.dust_positions().len(), 300);
    }

    #[test]
    fn test_theme_recolors_dust() {
        let mut scene = scene_with(SceneConfig::default());
        scene.set_theme_color("#00ff00").unwrap();
        assert_eq!(scene.dust_color(), Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_candles_need_lights_and_formation() {
        let mut scene = scene_with(SceneConfig::default());
        let t = run(&mut scene, 0.0, 1);
        assert_eq!(scene.candles().positions().len(), 90);

        scene.set_lights(false);
        let t = run(&mut scene, t, 1);
        assert!(scene.candles().positions().is_empty());

        scene.set_lights(true);
        scene.set_formed(false);
        run(&mut scene, t, 1);
        assert!(scene.candles().positions().is_empty());
    }

    #[test]
    fn test_drag_spins_scene() {
        let mut config = SceneConfig::default();
        config.is_formed = false;
        let mut scene = scene_with(config);

        scene.handle_pointer(PointerInput::new(PointerKind::Down, 0.0));
        scene.handle_pointer(PointerInput::new(PointerKind::Move, 100.0));
        scene.handle_pointer(PointerInput::new(PointerKind::Up, 100.0));
        run(&mut scene, 0.0, 30);
        assert!(scene.yaw() > 0.0);
    }

    #[test]
    fn test_auto_spin_when_formed() {
        let mut scene = scene_with(SceneConfig::default());
        run(&mut scene, 0.0, 60);
        // 0.2 * 0.5 radians per second, clockwise
        assert!((scene.yaw() + 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_scene_matrix_and_topper() {
        let scene = scene_with(SceneConfig::default());
        let origin = scene.scene_matrix().transform_point(Vec3::ZERO);
        assert!((origin.y + 2.0).abs() < 1e-6);

        assert_eq!(scene.topper_scale(), 1.0);
        let top = scene.topper_matrix().translation_part();
        assert_eq!(top, TOPPER_POSITION);
    }

    #[test]
    fn test_ornament_batches_fixed() {
        let mut scene = scene_with(SceneConfig::default());
        let sizes: Vec<usize> = OrnamentKind::ALL
            .iter()
            .map(|k| scene.ornaments().batch(*k).len())
            .collect();
        scene.set_formed(false);
        run(&mut scene, 0.0, 30);
        for (k, size) in OrnamentKind::ALL.iter().zip(sizes) {
            let batch = scene.ornaments().batch(*k);
            assert_eq!(batch.len(), size);
            assert_eq!(batch.matrices().len(), size * 16);
        }
    }

    #[test]
    fn test_bad_clock_values() {
        let mut scene = scene_with(SceneConfig::default());
        let before = scene.progress();
        scene.advance(FrameClock::new(f32::NAN, f32::NAN));
        scene.advance(FrameClock::new(1.0, -5.0));
        assert_eq!(scene.progress(), before);
        assert!(scene.foliage().positions().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_invalid_initial_config() {
        let mut config = SceneConfig::default();
        config.gradient_colors.pop();
        assert!(Scene::with_counts(config, small_counts(), StdRng::seed_from_u64(1)).is_err());
    }
}

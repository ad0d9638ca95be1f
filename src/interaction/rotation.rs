//! Drag-to-spin yaw control for the whole tree group

use super::pointer::{PointerInput, PointerKind};

/// Radians of angular velocity gained per pixel dragged
const DRAG_SENSITIVITY: f32 = 0.003;
/// Per-frame angular velocity damping
const DAMPING: f32 = 0.96;
const AUTO_SPIN_FACTOR: f32 = 0.5;

pub const MAX_ROTATION_SPEED: f32 = 2.0;

/// Yaw state driven by pointer drags plus a slow auto-spin while assembled
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationController {
    angle: f32,
    angular_velocity: f32,
    dragging: bool,
    last_x: f32,
}

impl RotationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a drag. Non-finite positions are ignored.
    pub fn pointer_down(&mut self, client_x: f32) {
        if !client_x.is_finite() {
            return;
        }
        self.dragging = true;
        self.last_x = client_x;
    }

    /// Ignored unless a drag is in progress
    pub fn pointer_move(&mut self, client_x: f32) {
        if !self.dragging || !client_x.is_finite() {
            return;
        }
        let delta = client_x - self.last_x;
        self.last_x = client_x;
        self.angular_velocity += delta * DRAG_SENSITIVITY;
    }

    /// Ends the drag. Hosts should route the window-level release here too.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn handle(&mut self, input: PointerInput) {
        match input.kind {
            PointerKind::Down => self.pointer_down(input.client_x),
            PointerKind::Move => self.pointer_move(input.client_x),
            PointerKind::Up | PointerKind::Leave => self.pointer_up(),
        }
    }

    /// Advance one frame. `rotation_speed` is clamped to `[0, 2]`.
    pub fn update(&mut self, dt: f32, formed: bool, rotation_speed: f32) {
        self.angular_velocity *= DAMPING;

        let auto_spin = if formed {
            let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            clamp_rotation_speed(rotation_speed) * dt * AUTO_SPIN_FACTOR
        } else {
            0.0
        };

        self.angle += self.angular_velocity - auto_spin;
    }

    /// Current yaw in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

pub fn clamp_rotation_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.clamp(0.0, MAX_ROTATION_SPEED)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_accumulates_velocity() {
        let mut rot = RotationController::new();
        rot.pointer_down(100.0);
        rot.pointer_move(110.0);
        rot.pointer_move(130.0);
        assert!((rot.angular_velocity() - 30.0 * 0.003).abs() < 1e-6);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut rot = RotationController::new();
        rot.pointer_move(500.0);
        assert_eq!(rot.angular_velocity(), 0.0);

        rot.pointer_down(0.0);
        rot.pointer_up();
        rot.pointer_move(50.0);
        assert_eq!(rot.angular_velocity(), 0.0);
    }

    #[test]
    fn test_non_finite_press_is_ignored() {
        let mut rot = RotationController::new();
        rot.pointer_down(f32::NAN);
        assert!(!rot.is_dragging());
        rot.pointer_move(120.0);
        rot.pointer_up();
        for _ in 0..600 {
            rot.update(1.0 / 60.0, true, 0.2);
        }
        assert!(rot.angular_velocity().is_finite());
        assert!(rot.angle().is_finite());

        // A later valid drag still works
        rot.pointer_down(f32::INFINITY);
        rot.pointer_down(10.0);
        rot.pointer_move(20.0);
        assert!((rot.angular_velocity() - 10.0 * 0.003).abs() < 1e-3);
    }

    #[test]
    fn test_leave_ends_drag() {
        let mut rot = RotationController::new();
        rot.handle(PointerInput::new(PointerKind::Down, 10.0));
        assert!(rot.is_dragging());
        rot.handle(PointerInput::new(PointerKind::Leave, 10.0));
        assert!(!rot.is_dragging());
    }

    #[test]
    fn test_velocity_decays_geometrically() {
        let mut rot = RotationController::new();
        rot.pointer_down(0.0);
        rot.pointer_move(100.0);
        rot.pointer_up();

        let mut prev = rot.angular_velocity();
        assert!(prev > 0.0);
        for _ in 0..200 {
            rot.update(1.0 / 60.0, false, 1.0);
            let v = rot.angular_velocity();
            assert!(v > 0.0);
            assert!((v - prev * 0.96).abs() < 1e-7);
            prev = v;
        }
    }

    #[test]
    fn test_auto_spin_only_when_formed() {
        let mut rot = RotationController::new();
        rot.update(0.5, false, 1.0);
        assert_eq!(rot.angle(), 0.0);

        rot.update(0.5, true, 1.0);
        assert!((rot.angle() + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_speed_clamped() {
        assert_eq!(clamp_rotation_speed(5.0), 2.0);
        assert_eq!(clamp_rotation_speed(-1.0), 0.0);
        assert_eq!(clamp_rotation_speed(f32::NAN), 0.0);

        let mut rot = RotationController::new();
        rot.update(1.0, true, 10.0);
        assert!((rot.angle() + 1.0).abs() < 1e-6);
    }
}

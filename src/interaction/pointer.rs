//! Pointer event records and screen to world mapping for cursor targeting

pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
pub const DEFAULT_CAMERA_DISTANCE: f32 = 8.0;

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

impl PointerKind {
    /// Map a DOM event type (`pointerdown`, `mouseup`, ...) to a kind
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        let phase = event_type
            .strip_prefix("pointer")
            .or_else(|| event_type.strip_prefix("mouse"))?;
        match phase {
            "down" => Some(Self::Down),
            "move" => Some(Self::Move),
            "up" | "cancel" => Some(Self::Up),
            "leave" | "out" => Some(Self::Leave),
            _ => None,
        }
    }
}

/// Drag input consumed by the rotation controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub client_x: f32,
}

impl PointerInput {
    pub fn new(kind: PointerKind, client_x: f32) -> Self {
        Self { kind, client_x }
    }
}

/// World-space extent of the camera's view at the plane z = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewPlane {
    fn default() -> Self {
        visible_plane(DEFAULT_FOV_DEGREES, DEFAULT_CAMERA_DISTANCE, 1.0)
    }
}

/// Visible plane size for a perspective camera `distance` units away.
///
/// Non-positive or non-finite aspect ratios fall back to square.
pub fn visible_plane(fov_degrees: f32, distance: f32, aspect: f32) -> ViewPlane {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    let height = 2.0 * distance.abs() * (fov_degrees.to_radians() * 0.5).tan();
    ViewPlane {
        width: height * aspect,
        height,
    }
}

/// Project normalized device coordinates onto the view plane
pub fn pointer_to_world(ndc_x: f32, ndc_y: f32, plane: &ViewPlane) -> (f32, f32) {
    (ndc_x * plane.width / 2.0, ndc_y * plane.height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_mapping() {
        assert_eq!(PointerKind::from_event_type("pointerdown"), Some(PointerKind::Down));
        assert_eq!(PointerKind::from_event_type("pointermove"), Some(PointerKind::Move));
        assert_eq!(PointerKind::from_event_type("pointerup"), Some(PointerKind::Up));
        assert_eq!(PointerKind::from_event_type("pointercancel"), Some(PointerKind::Up));
        assert_eq!(PointerKind::from_event_type("pointerleave"), Some(PointerKind::Leave));
        assert_eq!(PointerKind::from_event_type("mousedown"), Some(PointerKind::Down));
        assert_eq!(PointerKind::from_event_type("click"), None);
        assert_eq!(PointerKind::from_event_type("pointerenter"), None);
    }

    #[test]
    fn test_visible_plane() {
        let plane = visible_plane(90.0, 1.0, 2.0);
        assert!((plane.height - 2.0).abs() < 1e-5);
        assert!((plane.width - 4.0).abs() < 1e-5);

        let square = visible_plane(90.0, 1.0, f32::NAN);
        assert!((square.width - square.height).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_to_world() {
        let plane = ViewPlane {
            width: 10.0,
            height: 6.0,
        };
        assert_eq!(pointer_to_world(0.0, 0.0, &plane), (0.0, 0.0));
        assert_eq!(pointer_to_world(1.0, -1.0, &plane), (5.0, -3.0));
        assert_eq!(pointer_to_world(0.5, 0.5, &plane), (2.5, 1.5));
    }

    #[test]
    fn test_default_plane() {
        let plane = ViewPlane::default();
        // 2 * 8 * tan(22.5 deg)
        assert!((plane.height - 6.627417).abs() < 1e-4);
        assert_eq!(plane.width, plane.height);
    }
}

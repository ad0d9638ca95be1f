pub mod pointer;
pub mod rotation;

pub use pointer::{
    pointer_to_world, visible_plane, PointerInput, PointerKind, ViewPlane, DEFAULT_CAMERA_DISTANCE,
    DEFAULT_FOV_DEGREES,
};
pub use rotation::{clamp_rotation_speed, RotationController, MAX_ROTATION_SPEED};

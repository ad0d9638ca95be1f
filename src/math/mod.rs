pub mod vec3;
pub mod matrix;
pub mod sampling;

pub use vec3::Vec3;
pub use matrix::Mat4;
pub use sampling::{sample_cone, sample_sphere};

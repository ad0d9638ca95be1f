pub mod rgb;
pub mod gradient;

pub use rgb::Color;
pub use gradient::{gradient_t_for_height, GradientRamp, STOP_COUNT};

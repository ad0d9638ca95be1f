pub mod config;

pub use config::{SceneConfig, DEFAULT_GRADIENT, DEFAULT_THEME_COLOR};

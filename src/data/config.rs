use serde::{Deserialize, Serialize};

use crate::color::{Color, GradientRamp, STOP_COUNT};
use crate::interaction::clamp_rotation_speed;

/// Default gradient, top of the tree to the bottom
pub const DEFAULT_GRADIENT: [&str; STOP_COUNT] = ["#ef4444", "#fbbf24", "#10b981", "#3b82f6", "#8b5cf6"];
pub const DEFAULT_THEME_COLOR: &str = "#ffd700";

/// User-facing scene state, as edited by the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneConfig {
    pub is_formed: bool,
    pub rotation_speed: f32,
    pub gradient_colors: Vec<String>,
    #[serde(alias = "lightsOn")]
    pub lights_enabled: bool,
    #[serde(alias = "magicDust")]
    pub dust_enabled: bool,
    pub theme_color: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            is_formed: true,
            rotation_speed: 0.2,
            gradient_colors: DEFAULT_GRADIENT.iter().map(|s| s.to_string()).collect(),
            lights_enabled: true,
            dust_enabled: true,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

impl SceneConfig {
    /// Parse from YAML string. Missing fields keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: SceneConfig = serde_yaml::from_str(yaml)
            .map_err(|e| format!("YAML parse error: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(self).map_err(|e| format!("YAML write error: {}", e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.rotation_speed.is_finite() {
            return Err(format!("Rotation speed must be finite, got {}", self.rotation_speed));
        }
        self.gradient_ramp()?;
        self.theme()?;
        Ok(())
    }

    pub fn gradient_ramp(&self) -> Result<GradientRamp, String> {
        GradientRamp::from_hex(&self.gradient_colors)
    }

    pub fn theme(&self) -> Result<Color, String> {
        Color::from_hex(&self.theme_color).map_err(|e| format!("Theme color: {}", e))
    }

    /// Rotation speed limited to the slider range
    pub fn effective_rotation_speed(&self) -> f32 {
        clamp_rotation_speed(self.rotation_speed)
    }

    /// Replace one gradient stop, leaving the config untouched on error
    pub fn set_gradient_color(&mut self, index: usize, hex: &str) -> Result<(), String> {
        if index >= self.gradient_colors.len() {
            return Err(format!(
                "Gradient index {} out of range (have {} stops)",
                index,
                self.gradient_colors.len()
            ));
        }
        Color::from_hex(hex)?;
        self.gradient_colors[index] = hex.to_string();
        Ok(())
    }
}

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod color;
pub mod data;
pub mod formation;
pub mod interaction;
pub mod math;
pub mod particles;
pub mod scene;

use data::SceneConfig;
use formation::OrnamentKind;
use interaction::{PointerInput, PointerKind};
use scene::{FrameClock, Scene};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

fn js_err(e: String) -> JsValue {
    JsValue::from_str(&e)
}

/// Animation core exposed to JavaScript. The host renders; this produces buffers.
#[wasm_bindgen]
pub struct LuminaArbor {
    scene: Scene,
}

#[wasm_bindgen]
impl LuminaArbor {
    /// Create with the default scene state and fresh randomness
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<LuminaArbor, JsValue> {
        let scene = Scene::new(SceneConfig::default(), StdRng::from_entropy()).map_err(js_err)?;
        Ok(Self { scene })
    }

    /// Reproducible layout for a given seed
    #[wasm_bindgen]
    pub fn with_seed(seed: u32) -> Result<LuminaArbor, JsValue> {
        let scene = Scene::new(SceneConfig::default(), StdRng::seed_from_u64(seed as u64))
            .map_err(js_err)?;
        Ok(Self { scene })
    }

    /// Advance one frame. `elapsed` and `delta` are in seconds.
    #[wasm_bindgen]
    pub fn frame(&mut self, elapsed: f32, delta: f32) {
        self.scene.advance(FrameClock::new(elapsed, delta));
    }

    /// Replace the whole scene state from YAML
    #[wasm_bindgen]
    pub fn load_config_yaml(&mut self, yaml: &str) -> Result<(), JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(js_err)?;
        self.scene.apply_config(config).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn get_config_yaml(&self) -> Result<String, JsValue> {
        self.scene.config().to_yaml().map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn set_formed(&mut self, formed: bool) {
        self.scene.set_formed(formed);
    }

    #[wasm_bindgen]
    pub fn toggle_formed(&mut self) {
        let formed = self.scene.config().is_formed;
        self.scene.set_formed(!formed);
    }

    #[wasm_bindgen]
    pub fn set_rotation_speed(&mut self, speed: f32) -> Result<(), JsValue> {
        self.scene.set_rotation_speed(speed).map_err(js_err)
    }

    /// Replace all five gradient stops, top to bottom
    #[wasm_bindgen]
    pub fn set_gradient_colors(&mut self, colors: Vec<String>) -> Result<(), JsValue> {
        self.scene.set_gradient_colors(colors).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn set_gradient_color(&mut self, index: usize, hex: &str) -> Result<(), JsValue> {
        self.scene.set_gradient_color(index, hex).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn set_lights(&mut self, enabled: bool) {
        self.scene.set_lights(enabled);
    }

    #[wasm_bindgen]
    pub fn set_dust(&mut self, enabled: bool) {
        self.scene.set_dust(enabled);
    }

    #[wasm_bindgen]
    pub fn set_theme_color(&mut self, hex: &str) -> Result<(), JsValue> {
        self.scene.set_theme_color(hex).map_err(js_err)
    }

    // Pointer handling

    #[wasm_bindgen]
    pub fn pointer_down(&mut self, client_x: f32) {
        self.scene.handle_pointer(PointerInput::new(PointerKind::Down, client_x));
    }

    #[wasm_bindgen]
    pub fn pointer_move(&mut self, client_x: f32) {
        self.scene.handle_pointer(PointerInput::new(PointerKind::Move, client_x));
    }

    /// Hook this to the window as well so drags can't get stuck
    #[wasm_bindgen]
    pub fn pointer_up(&mut self) {
        self.scene.handle_pointer(PointerInput::new(PointerKind::Up, 0.0));
    }

    #[wasm_bindgen]
    pub fn pointer_leave(&mut self) {
        self.scene.handle_pointer(PointerInput::new(PointerKind::Leave, 0.0));
    }

    /// Feed a raw DOM pointer event. Returns false for event types that aren't handled.
    #[wasm_bindgen]
    pub fn handle_pointer_event(&mut self, event: &web_sys::PointerEvent) -> bool {
        match PointerKind::from_event_type(&event.type_()) {
            Some(kind) => {
                self.scene.handle_pointer(PointerInput::new(kind, event.client_x() as f32));
                true
            }
            None => false,
        }
    }

    /// Cursor in normalized device coordinates, for the dust target
    #[wasm_bindgen]
    pub fn set_pointer_ndc(&mut self, x: f32, y: f32) {
        self.scene.set_pointer_ndc(x, y);
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.scene.resize(width / height);
        }
    }

    // Render buffers

    #[wasm_bindgen]
    pub fn get_foliage_positions(&self) -> Vec<f32> {
        self.scene.foliage().positions().to_vec()
    }

    #[wasm_bindgen]
    pub fn get_foliage_colors(&self) -> Vec<f32> {
        self.scene.foliage().colors().to_vec()
    }

    #[wasm_bindgen]
    pub fn get_foliage_sizes(&self) -> Vec<f32> {
        self.scene.foliage().sizes().to_vec()
    }

    /// Instance matrices (16 floats each) for `box`, `fin` or `sphere`
    #[wasm_bindgen]
    pub fn get_ornament_matrices(&self, kind: &str) -> Result<Vec<f32>, JsValue> {
        let kind = parse_kind(kind)?;
        Ok(self.scene.ornaments().batch(kind).matrices().to_vec())
    }

    /// Instance colors (3 floats each) for `box`, `fin` or `sphere`
    #[wasm_bindgen]
    pub fn get_ornament_colors(&self, kind: &str) -> Result<Vec<f32>, JsValue> {
        let kind = parse_kind(kind)?;
        Ok(self.scene.ornaments().batch(kind).colors().to_vec())
    }

    #[wasm_bindgen]
    pub fn get_ornament_count(&self, kind: &str) -> Result<usize, JsValue> {
        let kind = parse_kind(kind)?;
        Ok(self.scene.ornaments().batch(kind).len())
    }

    #[wasm_bindgen]
    pub fn get_dust_positions(&self) -> Vec<f32> {
        self.scene.dust_positions().to_vec()
    }

    #[wasm_bindgen]
    pub fn get_dust_color(&self) -> Vec<f32> {
        self.scene.dust_color().to_array().to_vec()
    }

    #[wasm_bindgen]
    pub fn get_candle_positions(&self) -> Vec<f32> {
        self.scene.candles().positions().to_vec()
    }

    #[wasm_bindgen]
    pub fn get_scene_matrix(&self) -> Vec<f32> {
        self.scene.scene_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen]
    pub fn get_topper_matrix(&self) -> Vec<f32> {
        self.scene.topper_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen]
    pub fn get_yaw(&self) -> f32 {
        self.scene.yaw()
    }

    #[wasm_bindgen]
    pub fn get_progress(&self) -> f32 {
        self.scene.progress()
    }

    #[wasm_bindgen]
    pub fn get_topper_scale(&self) -> f32 {
        self.scene.topper_scale()
    }

    #[wasm_bindgen]
    pub fn is_formed(&self) -> bool {
        self.scene.config().is_formed
    }
}

fn parse_kind(name: &str) -> Result<OrnamentKind, JsValue> {
    OrnamentKind::from_name(name)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown ornament kind '{}'", name)))
}

use drift_core::{
    Color, FieldLayout, ParticleField, RepulseZone, ShapeKind, SimulationConfig, Vec3,
};
use drift_shared::Settings;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Particle field driven from JavaScript.
///
/// The page projects the mouse into world space and calls `update` once per
/// animation frame, then uploads `positions()` into its point-cloud geometry.
#[wasm_bindgen]
pub struct ParticleSimulation {
    field: ParticleField,
}

#[wasm_bindgen]
impl ParticleSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(shape: &str, count: u32, color: &str) -> Result<ParticleSimulation, JsValue> {
        console_log!("Initializing {} particle field with {} particles", shape, count);

        let kind: ShapeKind = shape.parse().map_err(js_error)?;
        let color = Color::from_hex(color).map_err(js_error)?;
        let layout = FieldLayout::new(kind, count).with_color(color);
        let field = ParticleField::new(layout, SimulationConfig::default()).map_err(js_error)?;

        Ok(ParticleSimulation { field })
    }

    /// Advance one frame with the pointer at `(x, y, z)`.
    pub fn update(&mut self, x: f32, y: f32, z: f32) {
        self.field.update_with_target(Some(Vec3::new(x, y, z)));
    }

    /// Advance one frame with no pointer over the canvas.
    pub fn relax(&mut self) {
        self.field.update();
    }

    /// Rebuild the field as `count` particles of `shape`, keeping the color.
    /// The current field stays in place if the shape is rejected.
    pub fn reshape(&mut self, shape: &str, count: u32) -> Result<(), JsValue> {
        let kind: ShapeKind = shape.parse().map_err(js_error)?;
        let layout = FieldLayout {
            kind,
            count,
            params: kind.default_params(),
            ..*self.field.layout()
        };
        self.field.reshape(layout).map_err(js_error)?;
        console_log!("Reshaped to {} x {}", kind, count);
        Ok(())
    }

    /// Apply a full settings document. The field is rebuilt only when the
    /// shape, count, color or starting speed changed.
    pub fn apply_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(js_error)?;
        let config = settings.simulation_config().map_err(js_error)?;
        let layout = settings.layout().map_err(js_error)?;

        if layout != *self.field.layout() {
            self.field.reshape(layout).map_err(js_error)?;
            console_log!("Rebuilt field: {} x {}", layout.kind, layout.count);
        }
        self.field.configure(config).map_err(js_error)
    }

    /// Flat `[x0, y0, z0, x1, ...]` copy of the current positions.
    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.field.particles().position_buffer())
    }

    /// Flat `[r0, g0, b0, r1, ...]` copy of the particle colors.
    pub fn colors(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.field.particles().color_buffer())
    }

    pub fn count(&self) -> u32 {
        self.field.count()
    }

    pub fn shape(&self) -> String {
        self.field.layout().kind.name().to_string()
    }

    pub fn set_repulse(&mut self, distance: f32, strength: f32) -> Result<(), JsValue> {
        self.reconfigure(|config| config.repulse = RepulseZone::new(distance, strength))
    }

    pub fn set_big_repulse(&mut self, distance: f32, strength: f32) -> Result<(), JsValue> {
        self.reconfigure(|config| config.big_repulse = RepulseZone::new(distance, strength))
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<(), JsValue> {
        self.reconfigure(|config| config.damping = damping)
    }

    pub fn set_return_force(&mut self, force: f32) -> Result<(), JsValue> {
        self.reconfigure(|config| config.return_force = force)
    }

    pub fn set_max_velocity(&mut self, max_velocity: f32) -> Result<(), JsValue> {
        self.reconfigure(|config| config.max_velocity = max_velocity)
    }

    pub fn set_restless(&mut self, enabled: bool, value: f32) -> Result<(), JsValue> {
        self.reconfigure(|config| {
            config.restless.enabled = enabled;
            config.restless.value = value;
        })
    }
}

impl ParticleSimulation {
    /// Apply `change` to a copy of the coefficients; keep the old ones if
    /// the result is out of range.
    fn reconfigure(&mut self, change: impl FnOnce(&mut SimulationConfig)) -> Result<(), JsValue> {
        let mut config = self.field.config;
        change(&mut config);
        self.field.configure(config).map_err(js_error)
    }
}

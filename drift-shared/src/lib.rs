//! Settings documents exchanged between drivers (CLI, browser) and the core.
//!
//! Field names follow the control panel groups: shape, interactions and
//! movement. Every field has a default and unknown fields are ignored, so
//! older and newer documents both load.

use drift_core::{
    Color, ConfigurationError, FieldLayout, ParticleSet, RepulseZone, Restless, ShapeKind,
    SimulationConfig,
};
use serde::{Deserialize, Serialize};

/// Which shape to build and how it looks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapeSettings {
    #[serde(alias = "shapeType")]
    pub shape: String,
    #[serde(alias = "particleCount")]
    pub count: u32,
    /// Hex color, e.g. `#030303`
    #[serde(alias = "particleColor")]
    pub color: String,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Torus.name().to_string(),
            count: 10_000,
            color: "#030303".to_string(),
        }
    }
}

impl ShapeSettings {
    pub fn kind(&self) -> Result<ShapeKind, ConfigurationError> {
        self.shape.parse()
    }

    pub fn base_color(&self) -> Result<Color, ConfigurationError> {
        Color::from_hex(&self.color)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoneSettings {
    pub distance: f32,
    pub strength: f32,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            distance: 22.0,
            strength: 1.0,
        }
    }
}

impl From<ZoneSettings> for RepulseZone {
    fn from(zone: ZoneSettings) -> Self {
        RepulseZone::new(zone.distance, zone.strength)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionSettings {
    pub repulse: ZoneSettings,
    #[serde(alias = "bigRepulse")]
    pub big_repulse: ZoneSettings,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            repulse: ZoneSettings::default(),
            big_repulse: ZoneSettings {
                distance: 5.0,
                strength: 10.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RestlessSettings {
    pub enabled: bool,
    pub value: f32,
}

impl Default for RestlessSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            value: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementSettings {
    /// Spread of the random starting velocity, applied when a shape is built
    pub speed: f32,
    pub damping: f32,
    #[serde(alias = "returnForce")]
    pub return_force: f32,
    #[serde(alias = "maxVelocity")]
    pub max_velocity: f32,
    pub restless: RestlessSettings,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: 0.1,
            damping: 0.095,
            return_force: 0.01,
            max_velocity: 1.0,
            restless: RestlessSettings::default(),
        }
    }
}

/// Complete settings document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub shape: ShapeSettings,
    pub interactions: InteractionSettings,
    pub movement: MovementSettings,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Per-frame coefficients, range-checked.
    pub fn simulation_config(&self) -> Result<SimulationConfig, ConfigurationError> {
        let config = SimulationConfig {
            repulse: self.interactions.repulse.into(),
            big_repulse: self.interactions.big_repulse.into(),
            damping: self.movement.damping,
            return_force: self.movement.return_force,
            max_velocity: self.movement.max_velocity,
            restless: Restless {
                enabled: self.movement.restless.enabled,
                value: self.movement.restless.value,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Shape selection with that shape's default parameters.
    pub fn layout(&self) -> Result<FieldLayout, ConfigurationError> {
        let kind = self.shape.kind()?;
        Ok(FieldLayout::new(kind, self.shape.count)
            .with_color(self.shape.base_color()?)
            .with_initial_speed(self.movement.speed))
    }
}

/// Snapshot of how disturbed a field is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub mean_displacement: f32,
    pub max_speed: f32,
}

impl FrameStats {
    pub fn capture(frame: u64, particles: &ParticleSet) -> Self {
        Self {
            frame,
            mean_displacement: particles.mean_displacement(),
            max_speed: particles.max_speed(),
        }
    }
}

/// Final frame written out by headless runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameDump {
    pub shape: String,
    pub count: u32,
    pub frames: u64,
    pub positions: Vec<[f32; 3]>,
}

impl FrameDump {
    pub fn capture(kind: ShapeKind, frames: u64, particles: &ParticleSet) -> Self {
        Self {
            shape: kind.name().to_string(),
            count: particles.count(),
            frames,
            positions: particles.positions().iter().map(|p| p.to_array()).collect(),
        }
    }
}

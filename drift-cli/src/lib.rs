//! Headless driver for a particle field.
//!
//! Stands in for the browser: a scripted pointer replaces the mouse, and
//! frame statistics replace the canvas.

use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use drift_core::{ParticleField, Vec3};
use drift_shared::{FrameDump, FrameStats, Settings};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Frames per pointer revolution.
pub const ORBIT_PERIOD: u32 = 240;

/// A pointer circling the origin in the z = 0 plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOrbit {
    pub radius: f32,
    pub period: u32,
}

impl PointerOrbit {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            period: ORBIT_PERIOD,
        }
    }

    pub fn position(&self, frame: u64) -> Vec3 {
        let period = self.period.max(1) as u64;
        let angle = (frame % period) as f32 / period as f32 * TAU;
        Vec3::new(self.radius * angle.cos(), self.radius * angle.sin(), 0.0)
    }
}

pub struct HeadlessRun {
    field: ParticleField,
    pointer: Option<PointerOrbit>,
    rng: StdRng,
    frame: u64,
}

impl HeadlessRun {
    /// Build the field described by `settings`. A `seed` makes the run repeatable.
    pub fn new(settings: &Settings, pointer: Option<PointerOrbit>, seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let layout = settings.layout().context("Invalid shape settings")?;
        let config = settings
            .simulation_config()
            .context("Invalid movement or interaction settings")?;
        let field = ParticleField::new_with(layout, config, &mut rng)
            .context("Failed to generate particle field")?;

        log::info!(
            "Generated {} {} particles",
            field.count(),
            field.layout().kind
        );

        Ok(Self {
            field,
            pointer,
            rng,
            frame: 0,
        })
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame and report where the field stands.
    pub fn advance(&mut self) -> FrameStats {
        let target = self.pointer.map(|orbit| orbit.position(self.frame));
        self.field.update_with(target, &mut self.rng);
        self.frame += 1;
        FrameStats::capture(self.frame, self.field.particles())
    }

    /// Run `frames` frames, logging every `report_every`-th one.
    pub fn run(&mut self, frames: u64, report_every: u64) -> Vec<FrameStats> {
        let mut reports = Vec::new();
        for _ in 0..frames {
            let stats = self.advance();
            log::debug!("{:?}", stats);

            if report_every > 0 && stats.frame % report_every == 0 {
                log::info!(
                    "frame {}: mean displacement {:.4}, max speed {:.4}",
                    stats.frame,
                    stats.mean_displacement,
                    stats.max_speed
                );
                reports.push(stats);
            }
        }
        reports
    }

    pub fn dump(&self) -> FrameDump {
        FrameDump::capture(self.field.layout().kind, self.frame, self.field.particles())
    }
}

/// Read a settings document, or fall back to defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            Settings::from_json(&json)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))
        }
        None => {
            log::info!("No settings file given, using defaults");
            Ok(Settings::default())
        }
    }
}

pub fn write_dump(path: &Path, dump: &FrameDump) -> Result<()> {
    let json = serde_json::to_string(dump).context("Failed to serialize frame")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {} positions to {}", dump.count, path.display());
    Ok(())
}

//! A particle set bundled with its shape selection and coefficients.

use rand::Rng;

use crate::color::Color;
use crate::error::ConfigurationError;
use crate::particles::ParticleSet;
use crate::shape::{generate_with, ShapeKind, ShapeParams};
use crate::simulation::{relax_with, step_with, SimulationConfig, Stimulus};
use crate::vector::Vec3;

/// Everything needed to (re)build a [`ParticleSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    pub kind: ShapeKind,
    pub count: u32,
    pub params: ShapeParams,
    pub color: Color,
    /// Spread of the random velocity each particle starts with.
    pub initial_speed: f32,
}

impl FieldLayout {
    pub fn new(kind: ShapeKind, count: u32) -> Self {
        Self {
            kind,
            count,
            params: kind.default_params(),
            color: Color::default(),
            initial_speed: 0.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_initial_speed(mut self, speed: f32) -> Self {
        self.initial_speed = speed;
        self
    }

    pub fn build_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<ParticleSet, ConfigurationError> {
        let positions = generate_with(self.kind, self.count, &self.params, rng)?;
        let mut particles = ParticleSet::new(positions, self.color);
        if self.initial_speed != 0.0 {
            particles.scatter_velocities(self.initial_speed, rng);
        }
        Ok(particles)
    }
}

/// A live particle field: the current set, how it was built, and the
/// coefficients applied each frame.
pub struct ParticleField {
    particles: ParticleSet,
    layout: FieldLayout,
    pub config: SimulationConfig,
}

impl ParticleField {
    pub fn new(layout: FieldLayout, config: SimulationConfig) -> Result<Self, ConfigurationError> {
        Self::new_with(layout, config, &mut rand::thread_rng())
    }

    pub fn new_with<R: Rng + ?Sized>(
        layout: FieldLayout,
        config: SimulationConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError> {
        let particles = layout.build_with(rng)?;
        Ok(Self {
            particles,
            layout,
            config,
        })
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn count(&self) -> u32 {
        self.particles.count()
    }

    /// Replace the coefficients after validating them.
    ///
    /// On error the current coefficients are kept.
    pub fn configure(&mut self, config: SimulationConfig) -> Result<(), ConfigurationError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Replace the whole set with one built from `layout`.
    ///
    /// On error the current set and layout are left untouched.
    pub fn reshape(&mut self, layout: FieldLayout) -> Result<(), ConfigurationError> {
        self.reshape_with(layout, &mut rand::thread_rng())
    }

    pub fn reshape_with<R: Rng + ?Sized>(
        &mut self,
        layout: FieldLayout,
        rng: &mut R,
    ) -> Result<(), ConfigurationError> {
        self.particles = layout.build_with(rng)?;
        self.layout = layout;
        Ok(())
    }

    pub fn update(&mut self) {
        self.update_with_target(None);
    }

    /// Advance one frame, pushing away from `target` when a pointer is present.
    pub fn update_with_target(&mut self, target: Option<Vec3>) {
        self.update_with(target, &mut rand::thread_rng());
    }

    pub fn update_with<R: Rng + ?Sized>(&mut self, target: Option<Vec3>, rng: &mut R) {
        match target {
            Some(target) => step_with(&mut self.particles, Stimulus::new(target), &self.config, rng),
            None => relax_with(&mut self.particles, &self.config, rng),
        }
    }
}

use alloc::vec;
use alloc::vec::Vec;

use rand::Rng;

use crate::color::Color;
use crate::vector::Vec3;

#[cfg(feature = "std")]
use crate::{error::ConfigurationError, shape::ShapeKind, shape::ShapeParams};

/// Simulation state for one shape instance.
///
/// All buffers hold exactly one entry per particle. The set is never resized;
/// a shape or count change builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    position: Vec<Vec3>,
    velocity: Vec<Vec3>,
    rest_position: Vec<Vec3>,
    color: Vec<Color>,
}

impl ParticleSet {
    /// Particles start at rest on `positions` with zero velocity.
    pub fn new(positions: Vec<Vec3>, base_color: Color) -> Self {
        let count = positions.len();
        Self {
            rest_position: positions.clone(),
            position: positions,
            velocity: vec![Vec3::ZERO; count],
            color: vec![base_color; count],
        }
    }

    /// Generate `count` points for `kind` and build a set from them.
    #[cfg(feature = "std")]
    pub fn from_shape(
        kind: ShapeKind,
        count: u32,
        params: &ShapeParams,
        base_color: Color,
    ) -> Result<Self, ConfigurationError> {
        let positions = crate::shape::generate(kind, count, params)?;
        Ok(Self::new(positions, base_color))
    }

    /// Give every velocity component a uniform kick in `[-speed/2, speed/2)`.
    pub fn scatter_velocities<R: Rng + ?Sized>(&mut self, speed: f32, rng: &mut R) {
        for velocity in self.velocity.iter_mut() {
            *velocity = Vec3::new(
                (rng.gen::<f32>() - 0.5) * speed,
                (rng.gen::<f32>() - 0.5) * speed,
                (rng.gen::<f32>() - 0.5) * speed,
            );
        }
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Number of particles, saturating at `u32::MAX`.
    pub fn count(&self) -> u32 {
        saturating_count(self.position.len())
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.position
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocity
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_position
    }

    pub fn colors(&self) -> &[Color] {
        &self.color
    }

    /// Displace particles directly, e.g. to replay a saved frame.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.position
    }

    pub fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.velocity
    }

    /// Positions as `[x0, y0, z0, x1, ...]` for the renderer.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.position)
    }

    /// Colors as `[r0, g0, b0, r1, ...]` for the renderer.
    pub fn color_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.color)
    }

    /// Average distance between each particle and its rest position.
    pub fn mean_displacement(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let total: f32 = self
            .position
            .iter()
            .zip(self.rest_position.iter())
            .map(|(p, rest)| p.distance(rest))
            .sum();
        total / self.len() as f32
    }

    pub fn max_speed(&self) -> f32 {
        self.velocity
            .iter()
            .map(Vec3::magnitude)
            .fold(0.0, f32::max)
    }

    /// Split borrow used by the stepper: live positions and velocities
    /// mutable, rest anchors read-only.
    pub(crate) fn buffers_mut(&mut self) -> (&mut [Vec3], &mut [Vec3], &[Vec3]) {
        (&mut self.position, &mut self.velocity, &self.rest_position)
    }
}

fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

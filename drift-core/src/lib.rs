#![cfg_attr(not(feature = "std"), no_std)]

//! Particle field simulation core.
//!
//! Generates point clouds on parametric surfaces and pushes them around a
//! pointer-driven stimulus, relaxing them back to their rest shape frame by
//! frame. Builds without `std` (with `alloc`) for embedded targets.

extern crate alloc;

mod math;

pub mod color;
pub mod error;
#[cfg(feature = "std")]
pub mod field;
pub mod particles;
pub mod shape;
pub mod simulation;
pub mod vector;

pub use color::Color;
pub use error::ConfigurationError;
#[cfg(feature = "std")]
pub use field::{FieldLayout, ParticleField};
pub use particles::ParticleSet;
#[cfg(feature = "std")]
pub use shape::generate;
pub use shape::{generate_with, KnotParams, ShapeKind, ShapeParams, MAX_EXTENT};
#[cfg(feature = "std")]
pub use simulation::{relax, step};
pub use simulation::{
    relax_with, step_particle, step_with, RepulseZone, Restless, SimulationConfig, Stimulus,
    MIN_DISTANCE,
};
pub use vector::Vec3;

//! One-tick force update for a [`ParticleSet`].
//!
//! Each particle is advanced independently of every other particle:
//! repulsion from the stimulus, damping, the return spring toward its rest
//! position, optional jitter, a per-component velocity clamp and finally
//! integration. The order is fixed; damping before the spring is what keeps
//! the relaxation free of ringing for small spring coefficients.

use rand::Rng;

use crate::error::ConfigurationError;
use crate::particles::ParticleSet;
use crate::vector::Vec3;

/// Distances below this are treated as exactly this far from the stimulus.
pub const MIN_DISTANCE: f32 = 1e-4;

/// A spherical zone around the stimulus with an inverse-square push.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulseZone {
    pub distance: f32,
    pub strength: f32,
}

impl RepulseZone {
    pub const fn new(distance: f32, strength: f32) -> Self {
        Self { distance, strength }
    }
}

/// Uniform per-step velocity noise that keeps the field from settling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restless {
    pub enabled: bool,
    pub value: f32,
}

/// Coefficients for a single simulation step.
///
/// May change every frame; nothing here is cached in the particle set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub repulse: RepulseZone,
    pub big_repulse: RepulseZone,
    /// Velocity multiplier applied every step, in `[0, 1]`.
    pub damping: f32,
    /// Spring coefficient toward the rest position.
    pub return_force: f32,
    /// Per-component velocity limit.
    pub max_velocity: f32,
    pub restless: Restless,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            repulse: RepulseZone::new(22.0, 1.0),
            big_repulse: RepulseZone::new(5.0, 10.0),
            damping: 0.095,
            return_force: 0.01,
            max_velocity: 1.0,
            restless: Restless {
                enabled: true,
                value: 0.01,
            },
        }
    }
}

impl SimulationConfig {
    /// Check the documented coefficient ranges.
    ///
    /// Zone distances are not compared against each other: a big zone wider
    /// than the normal zone is allowed and simply takes precedence.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check("repulse.distance", self.repulse.distance, 0.0, f32::MAX)?;
        check("repulse.strength", self.repulse.strength, f32::MIN, f32::MAX)?;
        check("big_repulse.distance", self.big_repulse.distance, 0.0, f32::MAX)?;
        check("big_repulse.strength", self.big_repulse.strength, f32::MIN, f32::MAX)?;
        check("damping", self.damping, 0.0, 1.0)?;
        check("return_force", self.return_force, 0.0, f32::MAX)?;
        check("max_velocity", self.max_velocity, 0.0, f32::MAX)?;
        check("restless.value", self.restless.value, 0.0, f32::MAX)
    }

    /// Magnitude of the push at `distance` from the stimulus.
    ///
    /// The big zone is checked first and wins outright wherever it applies,
    /// even when it extends past the normal zone; the two never add up.
    /// Zone membership uses the raw distance; only the divisor is held at
    /// [`MIN_DISTANCE`]. The result is always finite.
    pub fn repulsion_force(&self, distance: f32) -> f32 {
        let zone = if distance < self.big_repulse.distance {
            self.big_repulse
        } else if distance < self.repulse.distance {
            self.repulse
        } else {
            return 0.0;
        };
        let divisor = distance.max(MIN_DISTANCE);
        (zone.strength / (divisor * divisor)).clamp(f32::MIN, f32::MAX)
    }
}

fn check(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidConfig { name, value })
    }
}

/// Pointer position projected into simulation space for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stimulus {
    pub target: Vec3,
}

impl Stimulus {
    pub const fn new(target: Vec3) -> Self {
        Self { target }
    }

    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z))
    }
}

impl From<Vec3> for Stimulus {
    fn from(target: Vec3) -> Self {
        Self::new(target)
    }
}

/// Radial push away from `target`.
///
/// A particle sitting on the stimulus has no direction of its own, so it is
/// pushed along +Z (toward the viewer) as if [`MIN_DISTANCE`] away.
fn repulsion(position: Vec3, target: Vec3, config: &SimulationConfig) -> Vec3 {
    let offset = position - target;
    let distance = offset.magnitude();
    let direction = if distance > MIN_DISTANCE {
        offset / distance
    } else {
        Vec3::Z
    };

    let force = config.repulsion_force(distance);
    if force > 0.0 {
        direction * force
    } else {
        Vec3::ZERO
    }
}

fn jitter<R: Rng + ?Sized>(value: f32, rng: &mut R) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * value,
        (rng.gen::<f32>() - 0.5) * value,
        (rng.gen::<f32>() - 0.5) * value,
    )
}

/// Advance a single particle by one tick.
///
/// Reads nothing but its own arguments, so particles may be processed in
/// any order. `stimulus == None` skips repulsion entirely.
pub fn step_particle<R: Rng + ?Sized>(
    position: &mut Vec3,
    velocity: &mut Vec3,
    rest: Vec3,
    stimulus: Option<Stimulus>,
    config: &SimulationConfig,
    rng: &mut R,
) {
    let mut v = *velocity;

    if let Some(stimulus) = stimulus {
        v += repulsion(*position, stimulus.target, config);
    }

    v *= config.damping;
    v += (rest - *position) * config.return_force;

    if config.restless.enabled {
        v += jitter(config.restless.value, rng);
    }

    v = v.clamp_components(config.max_velocity);

    *velocity = v;
    *position += v;
}

fn advance<R: Rng + ?Sized>(
    set: &mut ParticleSet,
    stimulus: Option<Stimulus>,
    config: &SimulationConfig,
    rng: &mut R,
) {
    let (positions, velocities, rest) = set.buffers_mut();
    for ((position, velocity), rest) in positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .zip(rest.iter())
    {
        step_particle(position, velocity, *rest, stimulus, config, rng);
    }
}

/// Advance every particle in `set` by one tick, drawing jitter from `rng`.
pub fn step_with<R: Rng + ?Sized>(
    set: &mut ParticleSet,
    stimulus: Stimulus,
    config: &SimulationConfig,
    rng: &mut R,
) {
    advance(set, Some(stimulus), config, rng);
}

/// Like [`step_with`] with no pointer present: no repulsion this tick.
pub fn relax_with<R: Rng + ?Sized>(set: &mut ParticleSet, config: &SimulationConfig, rng: &mut R) {
    advance(set, None, config, rng);
}

/// [`step_with`] using the thread-local RNG.
#[cfg(feature = "std")]
pub fn step(set: &mut ParticleSet, stimulus: Stimulus, config: &SimulationConfig) {
    step_with(set, stimulus, config, &mut rand::thread_rng());
}

/// [`relax_with`] using the thread-local RNG.
#[cfg(feature = "std")]
pub fn relax(set: &mut ParticleSet, config: &SimulationConfig) {
    relax_with(set, config, &mut rand::thread_rng());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn calm() -> SimulationConfig {
        SimulationConfig {
            restless: Restless {
                enabled: false,
                value: 0.0,
            },
            ..SimulationConfig::default()
        }
    }

    /// Undamped, spring-free, unclamped: velocity after one step is exactly the push.
    fn raw_push() -> SimulationConfig {
        SimulationConfig {
            damping: 1.0,
            return_force: 0.0,
            max_velocity: f32::MAX,
            ..calm()
        }
    }

    fn far() -> Stimulus {
        Stimulus::at(1000.0, 1000.0, 1000.0)
    }

    fn single(position: Vec3) -> ParticleSet {
        ParticleSet::new(vec![position], Color::BLACK)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad = SimulationConfig {
            damping: 1.5,
            ..SimulationConfig::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigurationError::InvalidConfig {
                name: "damping",
                value: 1.5,
            })
        );

        let bad = SimulationConfig {
            max_velocity: f32::NAN,
            ..SimulationConfig::default()
        };
        assert!(bad.validate().is_err());

        // A big zone wider than the normal zone is accepted.
        let wide = SimulationConfig {
            big_repulse: RepulseZone::new(40.0, 10.0),
            ..SimulationConfig::default()
        };
        assert_eq!(wide.validate(), Ok(()));
    }

    #[test]
    fn test_rest_state_is_fixed_point() {
        let mut set = single(Vec3::new(1.0, 2.0, 3.0));
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            step_with(&mut set, far(), &calm(), &mut rng);
        }
        assert_eq!(set.positions(), set.rest_positions());
        assert_eq!(set.velocities()[0], Vec3::ZERO);
    }

    #[test]
    fn test_relaxation_converges_without_overshoot() {
        let rest = Vec3::new(2.0, 0.0, 0.0);
        let mut set = single(rest);
        set.positions_mut()[0] = Vec3::new(3.0, 0.0, 0.0);

        let config = calm();
        let mut rng = StdRng::seed_from_u64(1);
        let mut previous = 1.0;

        for _ in 0..1000 {
            step_with(&mut set, far(), &config, &mut rng);
            let error = set.positions()[0].x - rest.x;
            assert!(error >= -1e-6, "overshot rest position: {error}");
            assert!(error <= previous + 1e-6, "error grew: {error} > {previous}");
            previous = error;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn test_relax_without_stimulus_matches_far_stimulus() {
        let mut a = single(Vec3::ZERO);
        a.positions_mut()[0] = Vec3::new(0.5, -0.5, 0.25);
        let mut b = a.clone();

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            step_with(&mut a, far(), &calm(), &mut rng);
            relax_with(&mut b, &calm(), &mut rng);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_velocity_clamp_under_strong_forces() {
        let mut rng = StdRng::seed_from_u64(11);
        let rest: Vec<Vec3> = (0..200)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-3.0..3.0),
                    rng.gen_range(-3.0..3.0),
                    rng.gen_range(-3.0..3.0),
                )
            })
            .collect();
        let mut set = ParticleSet::new(rest, Color::BLACK);

        let config = SimulationConfig {
            repulse: RepulseZone::new(10.0, 500.0),
            big_repulse: RepulseZone::new(2.0, 5000.0),
            damping: 1.0,
            return_force: 0.8,
            max_velocity: 0.25,
            restless: Restless {
                enabled: true,
                value: 3.0,
            },
        };

        for frame in 0..50 {
            let t = frame as f32 * 0.3;
            step_with(&mut set, Stimulus::at(t.cos(), t.sin(), 0.0), &config, &mut rng);
            for v in set.velocities() {
                assert!(v.x.abs() <= 0.25 && v.y.abs() <= 0.25 && v.z.abs() <= 0.25);
            }
        }
    }

    #[test]
    fn test_repulsion_monotonic_in_distance() {
        let config = calm();
        let mut distances = [0.5, 1.0, 2.0, 4.9, 5.0, 7.5, 12.0, 21.9];
        distances.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for pair in distances.windows(2) {
            let (near, far) = (pair[0], pair[1]);
            let same_zone = (near < 5.0) == (far < 5.0);
            if same_zone {
                assert!(config.repulsion_force(near) >= config.repulsion_force(far));
            }
        }
        assert_eq!(config.repulsion_force(22.0), 0.0);
        assert_eq!(config.repulsion_force(100.0), 0.0);
    }

    #[test]
    fn test_closer_particle_pushed_harder() {
        let mut set = ParticleSet::new(
            vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)],
            Color::BLACK,
        );
        let mut rng = StdRng::seed_from_u64(1);
        step_with(&mut set, Stimulus::at(0.0, 0.0, 0.0), &raw_push(), &mut rng);

        let v = set.velocities();
        assert!(v[0].magnitude() >= v[1].magnitude());
        assert!(v[0].x > 0.0 && v[1].x > 0.0, "push points away from the stimulus");
    }

    #[test]
    fn test_big_zone_takes_precedence() {
        // Inside both zones: big strength only, never the sum.
        let mut set = single(Vec3::new(2.0, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(1);
        step_with(&mut set, Stimulus::at(0.0, 0.0, 0.0), &raw_push(), &mut rng);
        assert!((set.velocities()[0].x - 10.0 / 4.0).abs() < 1e-6);

        // Normal zone only.
        let mut set = single(Vec3::new(10.0, 0.0, 0.0));
        step_with(&mut set, Stimulus::at(0.0, 0.0, 0.0), &raw_push(), &mut rng);
        assert!((set.velocities()[0].x - 1.0 / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_wide_big_zone_overrides_normal_zone() {
        let config = SimulationConfig {
            big_repulse: RepulseZone::new(30.0, 10.0),
            ..raw_push()
        };
        let mut set = single(Vec3::new(0.0, 25.0, 0.0));
        let mut rng = StdRng::seed_from_u64(1);
        step_with(&mut set, Stimulus::at(0.0, 0.0, 0.0), &config, &mut rng);
        assert!((set.velocities()[0].y - 10.0 / 625.0).abs() < 1e-7);
    }

    #[test]
    fn test_zero_distance_pushes_along_z() {
        let mut set = single(Vec3::new(1.0, 1.0, 1.0));
        let mut rng = StdRng::seed_from_u64(1);
        let config = SimulationConfig {
            max_velocity: 0.5,
            ..calm()
        };
        step_with(&mut set, Stimulus::at(1.0, 1.0, 1.0), &config, &mut rng);

        let v = set.velocities()[0];
        assert!(v.is_finite());
        assert_eq!(v, Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(set.positions()[0], Vec3::new(1.0, 1.0, 1.5));
    }

    #[test]
    fn test_huge_strength_stays_on_axis() {
        let config = SimulationConfig {
            big_repulse: RepulseZone::new(5.0, 1e32),
            ..calm()
        };
        assert_eq!(config.validate(), Ok(()));
        assert!(config.repulsion_force(0.0).is_finite());
        let mut rng = StdRng::seed_from_u64(1);

        let mut set = single(Vec3::ZERO);
        step_with(&mut set, Stimulus::at(0.0, 0.0, 0.0), &config, &mut rng);
        assert_eq!(set.velocities()[0], Vec3::new(0.0, 0.0, 1.0));

        let mut set = single(Vec3::new(2e-4, 0.0, 0.0));
        step_with(&mut set, Stimulus::at(0.0, 0.0, 0.0), &config, &mut rng);
        let v = set.velocities()[0];
        assert!((v.x - 1.0).abs() < 1e-6, "{v:?}");
        assert!(v.y.abs() < 1e-6 && v.z.abs() < 1e-6, "{v:?}");
    }

    #[test]
    fn test_zone_narrower_than_min_distance_still_fires() {
        let config = SimulationConfig {
            repulse: RepulseZone::new(0.0, 0.0),
            big_repulse: RepulseZone::new(5e-5, 1e-8),
            ..raw_push()
        };
        let expected = 1e-8 / (MIN_DISTANCE * MIN_DISTANCE);
        assert!((config.repulsion_force(2e-5) - expected).abs() < 1e-6);
        assert_eq!(config.repulsion_force(5e-5), 0.0);
    }

    #[test]
    fn test_particle_order_does_not_matter() {
        let mut rng = StdRng::seed_from_u64(5);
        let rest: Vec<Vec3> = (0..64)
            .map(|i| Vec3::new(i as f32 * 0.1, (i % 7) as f32 * 0.3, (i % 3) as f32))
            .collect();
        let mut sequential = ParticleSet::new(rest, Color::BLACK);
        sequential.scatter_velocities(0.2, &mut rng);
        let mut shuffled = sequential.clone();

        let config = calm();
        let stimulus = Stimulus::at(1.0, 0.5, 0.0);

        for _ in 0..5 {
            step_with(&mut sequential, stimulus, &config, &mut rng);

            let (positions, velocities, rest) = shuffled.buffers_mut();
            for i in (0..positions.len()).rev() {
                step_particle(
                    &mut positions[i],
                    &mut velocities[i],
                    rest[i],
                    Some(stimulus),
                    &config,
                    &mut rng,
                );
            }
        }
        assert_eq!(sequential, shuffled);
    }

    #[test]
    fn test_damping_applies_before_spring() {
        let mut set = single(Vec3::ZERO);
        set.positions_mut()[0] = Vec3::new(1.0, 0.0, 0.0);
        set.velocities_mut()[0] = Vec3::new(0.5, 0.0, 0.0);

        let config = SimulationConfig {
            damping: 0.5,
            return_force: 0.1,
            ..calm()
        };
        let mut rng = StdRng::seed_from_u64(1);
        step_with(&mut set, far(), &config, &mut rng);

        // 0.5 * 0.5 + (0 - 1) * 0.1
        assert!((set.velocities()[0].x - 0.15).abs() < 1e-6);
        assert!((set.positions()[0].x - 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_restless_jitter_bounded() {
        let mut set = ParticleSet::new(vec![Vec3::ZERO; 100], Color::BLACK);
        let config = SimulationConfig {
            damping: 0.0,
            return_force: 0.0,
            restless: Restless {
                enabled: true,
                value: 0.2,
            },
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        relax_with(&mut set, &config, &mut rng);

        assert!(set.max_speed() > 0.0);
        for v in set.velocities() {
            for c in v.to_array() {
                assert!((-0.1..=0.1).contains(&c));
            }
        }
    }

    #[test]
    fn test_zero_restless_value_is_still() {
        let mut set = single(Vec3::ZERO);
        let config = SimulationConfig {
            restless: Restless {
                enabled: true,
                value: 0.0,
            },
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        relax_with(&mut set, &config, &mut rng);
        assert_eq!(set.velocities()[0], Vec3::ZERO);
    }
}

//! Point-cloud generators for the supported parametric surfaces.
//!
//! Every generator draws independent uniform samples per particle, so the
//! distribution follows the surface parametrisation rather than its area.

use alloc::string::String;
use alloc::vec::Vec;
use core::f32::consts::TAU;
use core::fmt;
use core::str::FromStr;

use rand::Rng;

use crate::error::ConfigurationError;
use crate::math;
use crate::vector::Vec3;

/// Upper bound on [`ShapeParams::extent`].
///
/// Keeps every coordinate small enough that squared distances between
/// generated points stay finite.
pub const MAX_EXTENT: f32 = 1e18;

/// The closed set of shapes a particle field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Torus,
    TorusKnot,
    Icosahedron,
    Sphere,
    Box,
    MobiusStrip,
    TrefoilKnot,
    Cloud,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Torus,
        ShapeKind::TorusKnot,
        ShapeKind::Icosahedron,
        ShapeKind::Sphere,
        ShapeKind::Box,
        ShapeKind::MobiusStrip,
        ShapeKind::TrefoilKnot,
        ShapeKind::Cloud,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Torus => "Torus",
            ShapeKind::TorusKnot => "TorusKnot",
            ShapeKind::Icosahedron => "Icosahedron",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Box => "Box",
            ShapeKind::MobiusStrip => "MobiusStrip",
            ShapeKind::TrefoilKnot => "TrefoilKnot",
            ShapeKind::Cloud => "Cloud",
        }
    }

    pub fn default_params(self) -> ShapeParams {
        ShapeParams::default_for(self)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ConfigurationError;

    /// Accepts the canonical names plus their snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Torus" | "torus" => Ok(ShapeKind::Torus),
            "TorusKnot" | "torus_knot" => Ok(ShapeKind::TorusKnot),
            "Icosahedron" | "icosahedron" => Ok(ShapeKind::Icosahedron),
            "Sphere" | "sphere" => Ok(ShapeKind::Sphere),
            "Box" | "box" => Ok(ShapeKind::Box),
            "MobiusStrip" | "mobius_strip" => Ok(ShapeKind::MobiusStrip),
            "TrefoilKnot" | "trefoil_knot" => Ok(ShapeKind::TrefoilKnot),
            "Cloud" | "cloud" => Ok(ShapeKind::Cloud),
            other => Err(ConfigurationError::UnknownShape(String::from(other))),
        }
    }
}

/// Torus-knot parameters shared by [`ShapeKind::TorusKnot`] and [`ShapeKind::Cloud`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnotParams {
    /// Distance from the knot's center line to the origin.
    pub radius: f32,
    /// Tube radius wound around the center line.
    pub tube: f32,
    /// Winding count around the axis of rotational symmetry.
    pub p: f32,
    /// Winding count around the tube.
    pub q: f32,
}

/// Per-shape parameters. Each variant belongs to the [`ShapeKind`] of the same name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeParams {
    Torus { radius: f32, tube_radius: f32 },
    TorusKnot(KnotParams),
    Icosahedron { radius: f32 },
    Sphere { radius: f32 },
    Box { size: f32 },
    /// `v = (u - offset) * width` for `u` uniform in `[0, 1)`; `0.5` centers the band.
    MobiusStrip { radius: f32, width: f32, offset: f32 },
    TrefoilKnot { scale: f32 },
    Cloud(KnotParams),
}

impl ShapeParams {
    pub fn default_for(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Torus => ShapeParams::Torus {
                radius: 4.0,
                tube_radius: 1.0,
            },
            ShapeKind::TorusKnot => ShapeParams::TorusKnot(KnotParams {
                radius: 1.7,
                tube: 3.0,
                p: 3.0,
                q: 3.0,
            }),
            ShapeKind::Icosahedron => ShapeParams::Icosahedron { radius: 5.0 },
            ShapeKind::Sphere => ShapeParams::Sphere { radius: 5.0 },
            ShapeKind::Box => ShapeParams::Box { size: 6.0 },
            ShapeKind::MobiusStrip => ShapeParams::MobiusStrip {
                radius: 3.0,
                width: 4.0,
                offset: 0.5,
            },
            ShapeKind::TrefoilKnot => ShapeParams::TrefoilKnot { scale: 7.0 },
            ShapeKind::Cloud => ShapeParams::Cloud(KnotParams {
                radius: 1.7,
                tube: 3.0,
                p: 2.1,
                q: 1.0,
            }),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParams::Torus { .. } => ShapeKind::Torus,
            ShapeParams::TorusKnot(_) => ShapeKind::TorusKnot,
            ShapeParams::Icosahedron { .. } => ShapeKind::Icosahedron,
            ShapeParams::Sphere { .. } => ShapeKind::Sphere,
            ShapeParams::Box { .. } => ShapeKind::Box,
            ShapeParams::MobiusStrip { .. } => ShapeKind::MobiusStrip,
            ShapeParams::TrefoilKnot { .. } => ShapeKind::TrefoilKnot,
            ShapeParams::Cloud(_) => ShapeKind::Cloud,
        }
    }

    /// Largest coordinate magnitude a generated point can reach.
    ///
    /// Overflows to infinity rather than wrapping for out-of-range inputs.
    pub fn extent(&self) -> f32 {
        match *self {
            ShapeParams::Torus {
                radius,
                tube_radius,
            } => radius + tube_radius,
            ShapeParams::TorusKnot(knot) | ShapeParams::Cloud(knot) => knot.radius + knot.tube,
            ShapeParams::Icosahedron { radius } | ShapeParams::Sphere { radius } => radius,
            ShapeParams::Box { size } => size * 0.5,
            ShapeParams::MobiusStrip {
                radius,
                width,
                offset,
            } => radius + (offset.abs() + 1.0) * width,
            ShapeParams::TrefoilKnot { scale } => scale + 2.0,
        }
    }

    /// Lengths must be finite and non-negative; everything else must be finite.
    /// The combined [`extent`](Self::extent) may not exceed [`MAX_EXTENT`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.validate_fields()?;
        let extent = self.extent();
        if extent <= MAX_EXTENT {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidParameter {
                name: "extent",
                value: extent,
            })
        }
    }

    fn validate_fields(&self) -> Result<(), ConfigurationError> {
        match *self {
            ShapeParams::Torus {
                radius,
                tube_radius,
            } => {
                length("radius", radius)?;
                length("tube_radius", tube_radius)
            }
            ShapeParams::TorusKnot(knot) | ShapeParams::Cloud(knot) => {
                length("radius", knot.radius)?;
                length("tube", knot.tube)?;
                winding("p", knot.p)?;
                winding("q", knot.q)
            }
            ShapeParams::Icosahedron { radius } | ShapeParams::Sphere { radius } => {
                length("radius", radius)
            }
            ShapeParams::Box { size } => length("size", size),
            ShapeParams::MobiusStrip {
                radius,
                width,
                offset,
            } => {
                length("radius", radius)?;
                length("width", width)?;
                finite("offset", offset)
            }
            ShapeParams::TrefoilKnot { scale } => length("scale", scale),
        }
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter { name, value })
    }
}

fn winding(name: &'static str, value: f32) -> Result<(), ConfigurationError> {
    finite(name, value)?;
    if value.abs() > MAX_EXTENT {
        return Err(ConfigurationError::InvalidParameter { name, value });
    }
    Ok(())
}

fn length(name: &'static str, value: f32) -> Result<(), ConfigurationError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigurationError::InvalidParameter { name, value });
    }
    Ok(())
}

/// Generate `count` rest positions for `kind`, drawing from `rng`.
///
/// `count == 0` yields an empty vector. Fails when `params` belongs to a
/// different kind or holds a negative/non-finite value.
pub fn generate_with<R: Rng + ?Sized>(
    kind: ShapeKind,
    count: u32,
    params: &ShapeParams,
    rng: &mut R,
) -> Result<Vec<Vec3>, ConfigurationError> {
    if params.kind() != kind {
        return Err(ConfigurationError::ShapeMismatch {
            expected: kind,
            found: params.kind(),
        });
    }
    params.validate()?;

    let points = (0..count).map(|_| sample(params, rng)).collect();
    Ok(points)
}

/// [`generate_with`] using the thread-local RNG.
#[cfg(feature = "std")]
pub fn generate(
    kind: ShapeKind,
    count: u32,
    params: &ShapeParams,
) -> Result<Vec<Vec3>, ConfigurationError> {
    generate_with(kind, count, params, &mut rand::thread_rng())
}

fn sample<R: Rng + ?Sized>(params: &ShapeParams, rng: &mut R) -> Vec3 {
    match *params {
        ShapeParams::Torus {
            radius,
            tube_radius,
        } => torus_point(radius, tube_radius, rng),
        ShapeParams::TorusKnot(knot) | ShapeParams::Cloud(knot) => knot_point(&knot, rng),
        ShapeParams::Icosahedron { radius } | ShapeParams::Sphere { radius } => {
            sphere_point(radius, rng)
        }
        ShapeParams::Box { size } => box_point(size, rng),
        ShapeParams::MobiusStrip {
            radius,
            width,
            offset,
        } => mobius_point(radius, width, offset, rng),
        ShapeParams::TrefoilKnot { scale } => trefoil_point(scale, rng),
    }
}

fn angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * TAU
}

/// Uniform on the sphere surface: `phi = acos(2r - 1)` avoids pole clustering.
fn sphere_point<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec3 {
    let theta = angle(rng);
    let phi = math::acos(2.0 * rng.gen::<f32>() - 1.0);
    Vec3::new(
        radius * math::sin(phi) * math::cos(theta),
        radius * math::sin(phi) * math::sin(theta),
        radius * math::cos(phi),
    )
}

fn torus_point<R: Rng + ?Sized>(radius: f32, tube_radius: f32, rng: &mut R) -> Vec3 {
    let theta = angle(rng);
    let phi = angle(rng);
    let ring = radius + tube_radius * math::cos(phi);
    Vec3::new(
        ring * math::cos(theta),
        ring * math::sin(theta),
        tube_radius * math::sin(phi),
    )
}

fn box_point<R: Rng + ?Sized>(size: f32, rng: &mut R) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * size,
        (rng.gen::<f32>() - 0.5) * size,
        (rng.gen::<f32>() - 0.5) * size,
    )
}

fn knot_point<R: Rng + ?Sized>(knot: &KnotParams, rng: &mut R) -> Vec3 {
    let theta = angle(rng);
    let phi = angle(rng);
    let ring = knot.radius + knot.tube * math::cos(knot.q * phi);
    Vec3::new(
        ring * math::cos(knot.p * theta),
        ring * math::sin(knot.p * theta),
        knot.tube * math::sin(knot.q * phi),
    )
}

fn mobius_point<R: Rng + ?Sized>(radius: f32, width: f32, offset: f32, rng: &mut R) -> Vec3 {
    let u = angle(rng);
    let v = (rng.gen::<f32>() - offset) * width;
    let half = u / 2.0;
    let ring = radius + v * math::cos(half);
    Vec3::new(ring * math::cos(u), ring * math::sin(u), v * math::sin(half))
}

fn trefoil_point<R: Rng + ?Sized>(scale: f32, rng: &mut R) -> Vec3 {
    let t = angle(rng);
    Vec3::new(
        scale * math::sin(t) + 2.0 * math::sin(2.0 * t),
        scale * math::cos(t) - 2.0 * math::cos(t),
        -math::sin(3.0 * t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_every_shape_yields_count_finite_points() {
        let mut rng = rng();
        for kind in ShapeKind::ALL {
            let points = generate_with(kind, 500, &kind.default_params(), &mut rng).unwrap();
            assert_eq!(points.len(), 500, "{kind}");
            assert!(points.iter().all(Vec3::is_finite), "{kind}");
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = rng();
        for kind in ShapeKind::ALL {
            let points = generate_with(kind, 0, &kind.default_params(), &mut rng).unwrap();
            assert!(points.is_empty());
        }
    }

    #[test]
    fn test_shape_names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>().unwrap(), kind);
        }
        assert_eq!("mobius_strip".parse::<ShapeKind>().unwrap(), ShapeKind::MobiusStrip);
    }

    #[test]
    fn test_unknown_shape_names() {
        for name in ["", "Teapot", "TORUS", "torusknot", "Sphere ", "Cube"] {
            assert_eq!(
                name.parse::<ShapeKind>(),
                Err(ConfigurationError::UnknownShape(name.into()))
            );
        }
    }

    #[test]
    fn test_params_kind_mismatch() {
        let mut rng = rng();
        let result = generate_with(
            ShapeKind::Torus,
            10,
            &ShapeParams::Sphere { radius: 1.0 },
            &mut rng,
        );
        assert_eq!(
            result,
            Err(ConfigurationError::ShapeMismatch {
                expected: ShapeKind::Torus,
                found: ShapeKind::Sphere,
            })
        );
    }

    #[test]
    fn test_negative_radius_rejected() {
        let mut rng = rng();
        let result = generate_with(
            ShapeKind::Sphere,
            10,
            &ShapeParams::Sphere { radius: -5.0 },
            &mut rng,
        );
        assert_eq!(
            result,
            Err(ConfigurationError::InvalidParameter {
                name: "radius",
                value: -5.0,
            })
        );

        let knot = ShapeParams::Cloud(KnotParams {
            radius: 1.0,
            tube: 1.0,
            p: f32::NAN,
            q: 1.0,
        });
        assert!(knot.validate().is_err());
    }

    #[test]
    fn test_overflowing_extent_rejected() {
        let mut rng = rng();
        let torus = ShapeParams::Torus {
            radius: 3e38,
            tube_radius: 3e38,
        };
        assert_eq!(
            generate_with(ShapeKind::Torus, 100, &torus, &mut rng),
            Err(ConfigurationError::InvalidParameter {
                name: "extent",
                value: f32::INFINITY,
            })
        );

        let rejected = [
            ShapeParams::TorusKnot(KnotParams {
                radius: 1e18,
                tube: 1e18,
                p: 3.0,
                q: 3.0,
            }),
            ShapeParams::Cloud(KnotParams {
                radius: 1.0,
                tube: 1.0,
                p: 3e38,
                q: 1.0,
            }),
            ShapeParams::MobiusStrip {
                radius: 1.0,
                width: 1e30,
                offset: 1e30,
            },
            ShapeParams::TrefoilKnot { scale: 2e18 },
            ShapeParams::Sphere { radius: 1e19 },
        ];
        for params in rejected {
            assert!(params.validate().is_err(), "{params:?} was accepted");
        }

        let large = ShapeParams::Torus {
            radius: 4e17,
            tube_radius: 4e17,
        };
        let points = generate_with(ShapeKind::Torus, 100, &large, &mut rng).unwrap();
        assert!(points.iter().all(Vec3::is_finite));
        assert!(points[0].magnitude_squared().is_finite());
    }

    #[test]
    fn test_sphere_points_on_surface() {
        let mut rng = rng();
        let params = ShapeParams::Icosahedron { radius: 2.5 };
        let points = generate_with(ShapeKind::Icosahedron, 1000, &params, &mut rng).unwrap();
        for p in points {
            assert!((p.magnitude() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_torus_points_on_tube() {
        let mut rng = rng();
        let points = generate_with(
            ShapeKind::Torus,
            1000,
            &ShapeParams::Torus {
                radius: 4.0,
                tube_radius: 1.0,
            },
            &mut rng,
        )
        .unwrap();
        for p in points {
            // Distance from the ring's center line equals the tube radius.
            let ring = (p.x * p.x + p.y * p.y).sqrt() - 4.0;
            let tube = (ring * ring + p.z * p.z).sqrt();
            assert!((tube - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_box_points_inside_bounds() {
        let mut rng = rng();
        let params = ShapeParams::Box { size: 6.0 };
        let points = generate_with(ShapeKind::Box, 1000, &params, &mut rng).unwrap();
        for p in points {
            for c in p.to_array() {
                assert!((-3.0..=3.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_mobius_band_width() {
        let mut rng = rng();
        let params = ShapeParams::MobiusStrip {
            radius: 3.0,
            width: 4.0,
            offset: 0.5,
        };
        let points = generate_with(ShapeKind::MobiusStrip, 1000, &params, &mut rng).unwrap();
        for p in points {
            // |v| <= width / 2, and the point sits at most |v| away from the center circle.
            let ring = (p.x * p.x + p.y * p.y).sqrt() - 3.0;
            let v = (ring * ring + p.z * p.z).sqrt();
            assert!(v <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_trefoil_depth_bounded() {
        let mut rng = rng();
        let points = generate_with(
            ShapeKind::TrefoilKnot,
            1000,
            &ShapeParams::TrefoilKnot { scale: 7.0 },
            &mut rng,
        )
        .unwrap();
        for p in points {
            assert!(p.z.abs() <= 1.0);
            assert!(p.x.abs() <= 9.0 + 1e-4);
        }
    }

    #[test]
    fn test_knot_within_outer_radius() {
        let mut rng = rng();
        for kind in [ShapeKind::TorusKnot, ShapeKind::Cloud] {
            let points = generate_with(kind, 1000, &kind.default_params(), &mut rng).unwrap();
            for p in points {
                assert!(p.magnitude() <= 1.7 + 3.0 + 1e-3, "{kind}");
            }
        }
    }

    #[test]
    fn test_zero_size_shapes_collapse() {
        let mut rng = rng();
        let params = ShapeParams::Box { size: 0.0 };
        let points = generate_with(ShapeKind::Box, 20, &params, &mut rng).unwrap();
        assert!(points.iter().all(|p| *p == Vec3::ZERO));
    }
}

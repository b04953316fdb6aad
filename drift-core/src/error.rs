//! Errors raised while building a particle set.
//!
//! Only generation and construction can fail. Stepping a simulation never
//! returns an error.

use alloc::string::String;
use core::fmt;

use crate::shape::ShapeKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Shape name that does not match any [`ShapeKind`].
    UnknownShape(String),
    /// Shape parameters were built for a different kind than requested.
    ShapeMismatch {
        expected: ShapeKind,
        found: ShapeKind,
    },
    /// Negative or non-finite shape parameter.
    InvalidParameter { name: &'static str, value: f32 },
    /// Color string that is not `#rgb` or `#rrggbb` hex.
    InvalidColor(String),
    /// Simulation coefficient outside its documented range.
    InvalidConfig { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownShape(name) => write!(f, "unknown shape kind '{}'", name),
            ConfigurationError::ShapeMismatch { expected, found } => write!(
                f,
                "shape parameters are for {} but {} was requested",
                found, expected
            ),
            ConfigurationError::InvalidParameter { name, value } => {
                write!(f, "invalid shape parameter {} = {}", name, value)
            }
            ConfigurationError::InvalidColor(color) => write!(f, "invalid color '{}'", color),
            ConfigurationError::InvalidConfig { name, value } => {
                write!(f, "simulation setting {} = {} is out of range", name, value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::UnknownShape("Teapot".into());
        assert_eq!(err.to_string(), "unknown shape kind 'Teapot'");

        let err = ConfigurationError::ShapeMismatch {
            expected: ShapeKind::Torus,
            found: ShapeKind::Sphere,
        };
        assert_eq!(
            err.to_string(),
            "shape parameters are for Sphere but Torus was requested"
        );

        let err = ConfigurationError::InvalidParameter {
            name: "radius",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "invalid shape parameter radius = -1");
    }
}

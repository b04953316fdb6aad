use alloc::string::String;
use bytemuck::{Pod, Zeroable};
use core::str::FromStr;

use crate::error::ConfigurationError;

/// Linear RGB color with components in `[0, 1]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// `#030303`, the near-black default particle color.
    pub const PARTICLE: Self = Self::new(3.0 / 255.0, 3.0 / 255.0, 3.0 / 255.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
    pub fn from_hex(hex: &str) -> Result<Self, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidColor(String::from(hex));
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Self::from_rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // Short form: each nibble is doubled, so "f" means "ff".
            3 => Ok(Self::from_rgb8(
                channel(&digits[0..1])? * 17,
                channel(&digits[1..2])? * 17,
                channel(&digits[2..3])? * 17,
            )),
            _ => Err(invalid()),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::PARTICLE
    }
}

impl FromStr for Color {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

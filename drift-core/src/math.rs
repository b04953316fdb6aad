//! Float helpers that route through `std` or `libm` depending on the build.

#[cfg(feature = "std")]
#[inline]
pub fn sqrt(x: f32) -> f32 {
    x.sqrt()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn sqrt(x: f32) -> f32 {
    libm::sqrtf(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn sin(x: f32) -> f32 {
    x.sin()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn sin(x: f32) -> f32 {
    libm::sinf(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn cos(x: f32) -> f32 {
    x.cos()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn cos(x: f32) -> f32 {
    libm::cosf(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn acos(x: f32) -> f32 {
    x.acos()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn acos(x: f32) -> f32 {
    libm::acosf(x)
}

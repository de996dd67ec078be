//! Equirectangular pixel → viewing direction.
//!
//! Column `i` maps linearly to longitude `φ = 2π·i/W` (columns taken in
//! reverse under [`OrientationConvention::Upright`]) and row `j` to
//! colatitude `θ`. The Cartesian vector is negated so it points from the
//! viewer at the sphere center out through the panorama pixel.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::OrientationConvention;

/// Colatitude and longitude `(θ, φ)` in radians for output pixel `(i, j)`.
///
/// Under [`OrientationConvention::Canonical`] `θ = π·j/H` and `φ = 2π·i/W`.
/// Under [`OrientationConvention::Upright`] `θ = π·(1 − j/H)` and
/// `φ = 2π·(W − 1 − i)/W`, i.e. the panorama is mirrored left to right.
#[inline]
#[must_use]
pub fn pixel_angles(
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    convention: OrientationConvention,
) -> (f64, f64) {
    let row = f64::from(j) / f64::from(height);
    let (theta, column) = match convention {
        OrientationConvention::Canonical => (PI * row, i),
        OrientationConvention::Upright => {
            (PI * (1.0 - row), width.saturating_sub(1).saturating_sub(i))
        }
    };
    let phi = TAU * (f64::from(column) / f64::from(width));
    (theta, phi)
}

/// Unit viewing direction for output pixel `(i, j)` of a `width × height` panorama.
///
/// `width` and `height` must be non-zero; callers validate dimensions first.
#[inline]
#[must_use]
pub fn equirect_direction(
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    convention: OrientationConvention,
) -> DVec3 {
    let (theta, phi) = pixel_angles(i, j, width, height, convention);
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    -DVec3::new(sin_t * cos_p, sin_t * sin_p, cos_t)
}

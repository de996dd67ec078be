//! Nearest-neighbor texel lookup.

use image::{Rgb, RgbImage};

/// Integer texel `(px, py)` for normalized `(u, v)` on a `width × height` image.
///
/// `px = clamp(floor(u·width), 0, width − 1)` and likewise for `py`. Values
/// outside \[0, 1\] and NaN clamp to the nearest edge (NaN to 0).
#[inline]
#[must_use]
pub fn texel_index(u: f64, v: f64, width: u32, height: u32) -> (u32, u32) {
    (axis_index(u, width), axis_index(v, height))
}

#[inline]
fn axis_index(t: f64, size: u32) -> u32 {
    let last = i64::from(size.saturating_sub(1));
    // Float-to-int `as` saturates and maps NaN to 0.
    let index = (t * f64::from(size)).floor() as i64;
    index.clamp(0, last) as u32
}

/// Color of the texel nearest to `(u, v)`, or `None` for an empty image.
#[must_use]
pub fn sample_nearest(image: &RgbImage, u: f64, v: f64) -> Option<Rgb<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let (px, py) = texel_index(u, v, width, height);
    image.get_pixel_checked(px, py).copied()
}

//! 2D local coordinates on a cube face.

use crate::CubeFace;

/// A point on one face image. `u` grows along the face's u-axis (columns),
/// `v` along its v-axis (rows); both are nominally in \[0, 1\].
///
/// Values are not clamped: directions on a cube edge can land a rounding
/// error outside the unit square, and the sampler is responsible for that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCoord {
    /// Which cube face this coordinate lies on.
    pub face: CubeFace,
    /// Horizontal parameter.
    pub u: f64,
    /// Vertical parameter.
    pub v: f64,
}

impl FaceCoord {
    /// A coordinate on `face`, stored as given.
    #[must_use]
    pub fn new(face: CubeFace, u: f64, v: f64) -> Self {
        Self { face, u, v }
    }

    /// `true` when both parameters lie in \[0, 1\] within `eps`.
    #[cfg(test)]
    pub(crate) fn is_on_face(&self, eps: f64) -> bool {
        let range = -eps..=1.0 + eps;
        range.contains(&self.u) && range.contains(&self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_coord_keeps_values() {
        let fc = FaceCoord::new(CubeFace::Bottom, -1e-16, 1.0 + 1e-16);
        assert_eq!(fc.u, -1e-16);
        assert_eq!(fc.v, 1.0 + 1e-16);
        assert!(fc.is_on_face(1e-12));
    }

    #[test]
    fn test_face_coord_outside() {
        let fc = FaceCoord::new(CubeFace::Front, 0.5, 1.5);
        assert!(!fc.is_on_face(1e-12));
    }
}

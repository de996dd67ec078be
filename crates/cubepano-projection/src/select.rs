//! Direction → face selection and face-local UV mapping.

use glam::DVec3;

use crate::{CubeFace, FaceCoord, FaceDescriptor, FaceTable, ProjectionError};

/// Shortest direction [`map_direction`] accepts.
const MIN_DIRECTION_LENGTH: f64 = 1e-12;

/// Pick the face whose normal has the largest dot product with `dir`.
///
/// Faces are visited in [`CubeFace::ALL`] order and only a strictly larger
/// dot product replaces the current choice, so ties go to the earlier face.
#[inline]
#[must_use]
pub fn select_face(dir: DVec3, table: &FaceTable) -> &FaceDescriptor {
    let descriptors = table.descriptors();
    let mut best = &descriptors[0];
    let mut best_dot = dir.dot(best.normal);
    for d in &descriptors[1..] {
        let dot = dir.dot(d.normal);
        if dot > best_dot {
            best = d;
            best_dot = dot;
        }
    }
    best
}

/// Largest-magnitude-axis form of [`select_face`].
///
/// Ties favour Y over X over Z and the positive side, which reproduces the
/// dot-product tie-break order.
#[must_use]
pub fn select_face_by_magnitude(dir: DVec3) -> CubeFace {
    let ax = dir.x.abs();
    let ay = dir.y.abs();
    let az = dir.z.abs();

    if ay >= ax && ay >= az {
        if dir.y >= 0.0 {
            CubeFace::Front
        } else {
            CubeFace::Back
        }
    } else if ax >= az {
        if dir.x >= 0.0 {
            CubeFace::Right
        } else {
            CubeFace::Left
        }
    } else if dir.z >= 0.0 {
        CubeFace::Top
    } else {
        CubeFace::Bottom
    }
}

/// Project `dir` onto `face`'s local frame and normalize to \[0, 1\].
///
/// The result is not clamped.
#[inline]
#[must_use]
pub fn map_to_face(dir: DVec3, face: &FaceDescriptor) -> FaceCoord {
    let u = (dir.dot(face.u_axis) + 1.0) * 0.5;
    let v = (dir.dot(face.v_axis) + 1.0) * 0.5;
    let u = if face.flip_u { 1.0 - u } else { u };
    FaceCoord::new(face.face, u, v)
}

/// Select a face for `dir` and map it to that face's coordinates.
///
/// # Errors
///
/// Returns [`ProjectionError::DegenerateDirection`] when `dir` is not finite
/// or is too short to determine a face.
pub fn map_direction(dir: DVec3, table: &FaceTable) -> Result<FaceCoord, ProjectionError> {
    let length = dir.length();
    if !length.is_finite() || length < MIN_DIRECTION_LENGTH {
        return Err(ProjectionError::DegenerateDirection {
            direction: dir,
            length,
        });
    }
    Ok(map_to_face(dir, select_face(dir, table)))
}

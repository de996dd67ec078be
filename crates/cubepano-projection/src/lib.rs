//! Cubemap-to-equirectangular projection math: face table, viewing directions,
//! face selection and face-local UV mapping.

mod direction;
mod error;
mod face;
mod face_coord;
mod select;

pub use direction::{equirect_direction, pixel_angles};
pub use error::ProjectionError;
pub use face::{CubeFace, FaceDescriptor, FaceTable, OrientationConvention};
pub use face_coord::FaceCoord;
pub use select::{map_direction, map_to_face, select_face, select_face_by_magnitude};

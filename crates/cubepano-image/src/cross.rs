//! Unity-style skybox cross composite.
//!
//! ```text
//!   [    ][top   ][     ][    ]
//!   [left][front ][right][back]
//!   [    ][bottom][     ][    ]
//! ```

use cubepano_projection::CubeFace;
use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::debug;

use crate::{CubeFaces, CubemapError};

/// Grid cell `(face, row, column)` of each face in the cross.
pub const CROSS_LAYOUT: [(CubeFace, u32, u32); 6] = [
    (CubeFace::Top, 0, 1),
    (CubeFace::Left, 1, 0),
    (CubeFace::Front, 1, 1),
    (CubeFace::Right, 1, 2),
    (CubeFace::Back, 1, 3),
    (CubeFace::Bottom, 2, 1),
];

const GRID_COLUMNS: u32 = 4;
const GRID_ROWS: u32 = 3;

/// Place the six faces into a `4·face_size × 3·face_size` cross on black.
///
/// Faces that are not `face_size` square are resized with a Lanczos3 filter.
///
/// # Errors
///
/// [`CubemapError::InvalidFaceSize`] if `face_size` is zero or the composite
/// would not fit in `u32` dimensions.
pub fn compose_skybox_cross(faces: &CubeFaces, face_size: u32) -> Result<RgbImage, CubemapError> {
    if face_size == 0 {
        return Err(CubemapError::InvalidFaceSize(face_size));
    }
    let width = face_size
        .checked_mul(GRID_COLUMNS)
        .ok_or(CubemapError::InvalidFaceSize(face_size))?;
    let height = face_size * GRID_ROWS;

    let mut canvas = RgbImage::new(width, height);
    for (face, row, col) in CROSS_LAYOUT {
        let x = i64::from(col * face_size);
        let y = i64::from(row * face_size);
        let image = faces.image(face);
        if image.dimensions() == (face_size, face_size) {
            imageops::replace(&mut canvas, image, x, y);
        } else {
            debug!(
                "Resizing {face} face {}x{} -> {face_size}x{face_size}",
                image.width(),
                image.height()
            );
            let tile = imageops::resize(image, face_size, face_size, FilterType::Lanczos3);
            imageops::replace(&mut canvas, &tile, x, y);
        }
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;
    use crate::FaceMap;

    fn color(face: CubeFace) -> Rgb<u8> {
        Rgb([10 + face.index() as u8 * 40, 0, 255 - face.index() as u8 * 40])
    }

    fn faces_of(size: impl Fn(CubeFace) -> (u32, u32)) -> CubeFaces {
        CubeFaces::new(FaceMap::from_fn(|face| {
            let (w, h) = size(face);
            RgbImage::from_pixel(w, h, color(face))
        }))
        .unwrap()
    }

    #[test]
    fn test_layout_positions() {
        let faces = faces_of(|_| (8, 8));
        let cross = compose_skybox_cross(&faces, 8).unwrap();
        assert_eq!(cross.dimensions(), (32, 24));

        for (face, row, col) in CROSS_LAYOUT {
            let (x0, y0) = (col * 8, row * 8);
            for (dx, dy) in [(0, 0), (7, 7), (3, 4)] {
                assert_eq!(*cross.get_pixel(x0 + dx, y0 + dy), color(face), "{face}");
            }
        }
    }

    #[test]
    fn test_empty_cells_stay_black() {
        let cross = compose_skybox_cross(&faces_of(|_| (4, 4)), 4).unwrap();
        for (row, col) in [(0, 0), (0, 2), (0, 3), (2, 0), (2, 2), (2, 3)] {
            assert_eq!(*cross.get_pixel(col * 4 + 1, row * 4 + 1), Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn test_mismatched_faces_are_resized() {
        let faces = faces_of(|face| match face {
            CubeFace::Top => (3, 17),
            CubeFace::Back => (64, 64),
            _ => (16, 16),
        });
        let cross = compose_skybox_cross(&faces, 16).unwrap();
        assert_eq!(cross.dimensions(), (64, 48));
        // Solid faces stay solid through the resize.
        assert_eq!(*cross.get_pixel(16 + 8, 8), color(CubeFace::Top));
        assert_eq!(*cross.get_pixel(48 + 8, 16 + 8), color(CubeFace::Back));
    }

    #[test]
    fn test_zero_face_size_rejected() {
        let err = compose_skybox_cross(&faces_of(|_| (2, 2)), 0).unwrap_err();
        assert!(matches!(err, CubemapError::InvalidFaceSize(0)));
    }
}

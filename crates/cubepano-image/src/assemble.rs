//! Frame assembler: fills an equirectangular panorama from six cube faces.
//!
//! Every output pixel runs direction → face → UV → texel independently, so
//! the output buffer is split into contiguous row bands and each band is
//! rendered on its own scoped thread. Bands never overlap and faces are only
//! read, so no synchronization is needed beyond joining the threads.

use std::path::Path;

use cubepano_projection::{FaceTable, OrientationConvention, equirect_direction, map_direction};
use image::RgbImage;
use tracing::{debug, info};

use crate::{CubeFaces, CubemapError};

const CHANNELS: usize = 3;

/// Output size, orientation and parallelism for one panorama.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Panorama width in pixels.
    pub width: u32,
    /// Panorama height in pixels.
    pub height: u32,
    /// Face table and pole orientation.
    pub convention: OrientationConvention,
    /// Worker threads for row bands; 0 picks the CPU count.
    pub threads: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
            convention: OrientationConvention::default(),
            threads: 0,
        }
    }
}

impl RenderOptions {
    /// Options for a `width × height` panorama with default orientation and threads.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Use `convention` for the face table and pole orientation.
    #[must_use]
    pub fn with_convention(mut self, convention: OrientationConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Render on `threads` row bands (0 = one per CPU).
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Check the output size and return the buffer length in bytes.
    fn buffer_len(&self) -> Result<usize, CubemapError> {
        let invalid = || CubemapError::InvalidDimensions {
            width: self.width,
            height: self.height,
        };
        if self.width == 0 || self.height == 0 {
            return Err(invalid());
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(invalid)
    }

    fn worker_count(&self) -> usize {
        let requested = if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        };
        requested.clamp(1, self.height as usize)
    }
}

/// Render the equirectangular panorama for `faces`.
///
/// The result is deterministic: the same faces and options always produce
/// the same pixels, whatever the thread count.
///
/// # Errors
///
/// [`CubemapError::InvalidDimensions`] for a zero or oversized output,
/// [`CubemapError::Degenerate`] if a pixel direction cannot be mapped, and
/// [`CubemapError::Worker`] if a band thread cannot be spawned.
pub fn render_equirect(
    faces: &CubeFaces,
    options: &RenderOptions,
) -> Result<RgbImage, CubemapError> {
    let len = options.buffer_len()?;
    let row_len = options.width as usize * CHANNELS;
    let workers = options.worker_count();
    let rows_per_band = (options.height as usize).div_ceil(workers);
    let table = options.convention.table();

    debug!(
        "Rendering {}x{} panorama ({}, {workers} bands)",
        options.width, options.height, options.convention
    );

    let mut buffer = vec![0u8; len];
    if workers == 1 {
        render_rows(faces, options, table, 0, &mut buffer)?;
    } else {
        std::thread::scope(|scope| -> Result<(), CubemapError> {
            let mut handles = Vec::with_capacity(workers);
            for (band, rows) in buffer.chunks_mut(rows_per_band * row_len).enumerate() {
                let first_row = band * rows_per_band;
                let handle = std::thread::Builder::new()
                    .name(format!("equirect-band-{band}"))
                    .spawn_scoped(scope, move || {
                        render_rows(faces, options, table, first_row, rows)
                    })
                    .map_err(CubemapError::Worker)?;
                handles.push(handle);
            }
            for handle in handles {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
            }
            Ok(())
        })?;
    }

    RgbImage::from_raw(options.width, options.height, buffer).ok_or(
        CubemapError::InvalidDimensions {
            width: options.width,
            height: options.height,
        },
    )
}

/// Fill `rows` (whole output rows starting at `first_row`).
fn render_rows(
    faces: &CubeFaces,
    options: &RenderOptions,
    table: &FaceTable,
    first_row: usize,
    rows: &mut [u8],
) -> Result<(), CubemapError> {
    let row_len = options.width as usize * CHANNELS;
    for (offset, row) in rows.chunks_exact_mut(row_len).enumerate() {
        let j = (first_row + offset) as u32;
        for (i, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let dir = equirect_direction(
                i as u32,
                j,
                options.width,
                options.height,
                options.convention,
            );
            let coord = map_direction(dir, table)?;
            pixel.copy_from_slice(&faces.sample(&coord).0);
        }
    }
    Ok(())
}

/// Write `image` to `path`, creating parent directories. The format follows
/// the file extension.
///
/// # Errors
///
/// [`CubemapError::Encode`] if the directory or file cannot be written.
pub fn save_image(image: &RgbImage, path: &Path) -> Result<(), CubemapError> {
    let encode_err = |source| CubemapError::Encode {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| encode_err(image::ImageError::IoError(e)))?;
    }
    image.save(path).map_err(encode_err)?;
    info!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use cubepano_projection::{CubeFace, select_face};
    use image::Rgb;

    use super::*;
    use crate::FaceMap;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn face_color(face: CubeFace) -> Rgb<u8> {
        match face {
            CubeFace::Front => RED,
            CubeFace::Back => GREEN,
            CubeFace::Left => BLUE,
            CubeFace::Right => YELLOW,
            CubeFace::Top => WHITE,
            CubeFace::Bottom => BLACK,
        }
    }

    fn solid_faces(size: u32) -> CubeFaces {
        CubeFaces::new(FaceMap::from_fn(|face| {
            RgbImage::from_pixel(size, size, face_color(face))
        }))
        .unwrap()
    }

    /// Faces with a per-texel gradient so that UV mistakes show up.
    fn gradient_faces() -> CubeFaces {
        CubeFaces::new(FaceMap::from_fn(|face| {
            let (w, h) = (24 + face.index() as u32, 16);
            RgbImage::from_fn(w, h, |x, y| {
                Rgb([(x * 10) as u8, (y * 15) as u8, face.index() as u8])
            })
        }))
        .unwrap()
    }

    #[test]
    fn test_solid_faces_center_row() {
        let faces = solid_faces(64);
        let options = RenderOptions::new(8, 4);
        let out = render_equirect(&faces, &options).unwrap();
        assert_eq!(out.dimensions(), (8, 4));

        let table = options.convention.table();
        for i in 0..8 {
            let dir = equirect_direction(i, 2, 8, 4, options.convention);
            let expected = face_color(select_face(dir, table).face);
            assert_eq!(*out.get_pixel(i, 2), expected, "column {i}");
        }
        assert_eq!(*out.get_pixel(0, 2), BLUE);
        assert_eq!(*out.get_pixel(2, 2), GREEN);
        assert_eq!(*out.get_pixel(4, 2), YELLOW);
        assert_eq!(*out.get_pixel(6, 2), RED);
    }

    #[test]
    fn test_canonical_top_row_is_bottom_face() {
        let out = render_equirect(&solid_faces(64), &RenderOptions::new(8, 4)).unwrap();
        for i in 0..8 {
            assert_eq!(*out.get_pixel(i, 0), BLACK);
        }
    }

    #[test]
    fn test_upright_top_row_is_top_face() {
        let options = RenderOptions::new(8, 4).with_convention(OrientationConvention::Upright);
        let out = render_equirect(&solid_faces(64), &options).unwrap();
        for i in 0..8 {
            assert_eq!(*out.get_pixel(i, 0), WHITE);
        }
    }

    #[test]
    fn test_upright_matches_reference_pixels() {
        // 8x8 faces, texel (x, y) of face k is (30x, 30y, 40k).
        let faces = CubeFaces::new(FaceMap::from_fn(|face| {
            RgbImage::from_fn(8, 8, |x, y| {
                Rgb([(x * 30) as u8, (y * 30) as u8, face.index() as u8 * 40])
            })
        }))
        .unwrap();
        let options = RenderOptions::new(16, 8).with_convention(OrientationConvention::Upright);
        let out = render_equirect(&faces, &options).unwrap();

        #[rustfmt::skip]
        let expected: [((u32, u32), [u8; 3]); 24] = [
            ((0, 1), [150, 90, 160]), ((2, 1), [120, 60, 160]),
            ((4, 1), [90, 60, 160]), ((6, 1), [60, 90, 160]),
            ((8, 1), [60, 120, 160]), ((10, 1), [90, 150, 160]),
            ((12, 1), [120, 150, 160]), ((14, 1), [150, 120, 160]),
            ((0, 3), [150, 60, 120]), ((2, 3), [60, 60, 0]),
            ((4, 3), [150, 60, 0]), ((6, 3), [60, 60, 80]),
            ((8, 3), [150, 60, 80]), ((10, 3), [60, 60, 40]),
            ((12, 3), [150, 60, 40]), ((14, 3), [60, 60, 120]),
            ((0, 5), [150, 150, 120]), ((2, 5), [60, 150, 0]),
            ((4, 5), [150, 150, 0]), ((6, 5), [60, 150, 80]),
            ((8, 5), [150, 150, 80]), ((10, 5), [60, 150, 40]),
            ((12, 5), [150, 150, 40]), ((14, 5), [60, 150, 120]),
        ];
        for ((i, j), color) in expected {
            assert_eq!(*out.get_pixel(i, j), Rgb(color), "({i}, {j})");
        }
    }

    #[test]
    fn test_upright_is_canonical_mirrored_for_side_faces() {
        // On the equator only side faces are hit, and those are never flipped.
        let faces = gradient_faces();
        let canonical = render_equirect(&faces, &RenderOptions::new(32, 16)).unwrap();
        let upright = render_equirect(
            &faces,
            &RenderOptions::new(32, 16).with_convention(OrientationConvention::Upright),
        )
        .unwrap();
        for i in 0..32 {
            assert_eq!(upright.get_pixel(i, 8), canonical.get_pixel(31 - i, 8), "column {i}");
        }
    }

    #[test]
    fn test_every_pixel_comes_from_selected_face() {
        let faces = solid_faces(16);
        let options = RenderOptions::new(64, 32);
        let out = render_equirect(&faces, &options).unwrap();
        let table = options.convention.table();
        for (i, j, pixel) in out.enumerate_pixels() {
            let dir = equirect_direction(i, j, 64, 32, options.convention);
            assert_eq!(*pixel, face_color(select_face(dir, table).face), "({i}, {j})");
        }
    }

    #[test]
    fn test_front_face_orientation() {
        // Left half red, right half blue.
        let images = FaceMap::from_fn(|face| {
            if face == CubeFace::Front {
                RgbImage::from_fn(8, 8, |x, _| if x < 4 { RED } else { BLUE })
            } else {
                RgbImage::from_pixel(8, 8, face_color(face))
            }
        });
        let faces = CubeFaces::new(images).unwrap();
        let out = render_equirect(&faces, &RenderOptions::new(64, 32)).unwrap();
        // Column 48 looks straight at the front face; 47 leans toward +X.
        assert_eq!(*out.get_pixel(47, 16), BLUE);
        assert_eq!(*out.get_pixel(49, 16), RED);
    }

    #[test]
    fn test_render_is_idempotent() {
        let faces = gradient_faces();
        let options = RenderOptions::new(96, 48);
        let a = render_equirect(&faces, &options).unwrap();
        let b = render_equirect(&faces, &options).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let faces = gradient_faces();
        let base = RenderOptions::new(50, 37);
        let single = render_equirect(&faces, &base.with_threads(1)).unwrap();
        for threads in [2, 3, 8, 64] {
            let multi = render_equirect(&faces, &base.with_threads(threads)).unwrap();
            assert_eq!(single.as_raw(), multi.as_raw(), "{threads} threads");
        }
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let faces = solid_faces(4);
        for (w, h) in [(0, 4), (4, 0), (0, 0)] {
            let err = render_equirect(&faces, &RenderOptions::new(w, h)).unwrap_err();
            assert!(matches!(err, CubemapError::InvalidDimensions { .. }), "{w}x{h}");
        }
    }

    #[test]
    fn test_single_row_output() {
        let out = render_equirect(&solid_faces(4), &RenderOptions::new(5, 1).with_threads(4))
            .unwrap();
        assert_eq!(out.dimensions(), (5, 1));
    }

    #[test]
    fn test_save_image_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/pano.png");
        let out = render_equirect(&solid_faces(4), &RenderOptions::new(8, 4)).unwrap();
        save_image(&out, &path).unwrap();
        let reloaded = image::open(&path).unwrap().into_rgb8();
        assert_eq!(reloaded.as_raw(), out.as_raw());
    }

    #[test]
    fn test_save_image_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pano.unknownext");
        let out = RgbImage::new(2, 2);
        let err = save_image(&out, &path).unwrap_err();
        assert!(matches!(err, CubemapError::Encode { .. }));
    }
}

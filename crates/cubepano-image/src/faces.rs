//! Per-face containers and the validated set of six face images.

use std::ops::Index;
use std::path::{Path, PathBuf};

use cubepano_projection::{CubeFace, FaceCoord};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::CubemapError;
use crate::sampler::texel_index;

/// One value per cube face, indexed by [`CubeFace`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceMap<T> {
    /// Always six entries in [`CubeFace::ALL`] order.
    items: Vec<T>,
}

impl<T> FaceMap<T> {
    /// Build a map by calling `f` for every face.
    pub fn from_fn(f: impl FnMut(CubeFace) -> T) -> Self {
        Self {
            items: CubeFace::ALL.into_iter().map(f).collect(),
        }
    }

    /// Build a map by calling a fallible `f` for every face, stopping at the first error.
    pub fn try_from_fn<E>(f: impl FnMut(CubeFace) -> Result<T, E>) -> Result<Self, E> {
        let items = CubeFace::ALL
            .into_iter()
            .map(f)
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { items })
    }

    /// Build a map from values given in command-line order:
    /// front, back, left, right, top, bottom.
    pub fn from_ordered(front: T, back: T, left: T, right: T, top: T, bottom: T) -> Self {
        Self {
            items: vec![front, back, right, left, top, bottom],
        }
    }

    /// The value for `face`.
    #[inline]
    pub fn get(&self, face: CubeFace) -> &T {
        &self.items[face.index()]
    }

    /// Iterate `(face, value)` pairs in [`CubeFace::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (CubeFace, &T)> {
        CubeFace::ALL.into_iter().zip(self.items.iter())
    }

    /// Map every value, keeping the face association.
    pub fn map<U>(&self, mut f: impl FnMut(CubeFace, &T) -> U) -> FaceMap<U> {
        FaceMap::from_fn(|face| f(face, self.get(face)))
    }

    /// Fallible [`FaceMap::map`].
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(CubeFace, &T) -> Result<U, E>,
    ) -> Result<FaceMap<U>, E> {
        FaceMap::try_from_fn(|face| f(face, self.get(face)))
    }
}

impl<T> Index<CubeFace> for FaceMap<T> {
    type Output = T;

    fn index(&self, face: CubeFace) -> &T {
        self.get(face)
    }
}

/// Six face images, each non-empty. Faces may differ in size and aspect.
#[derive(Clone, Debug)]
pub struct CubeFaces {
    images: FaceMap<RgbImage>,
}

impl CubeFaces {
    /// Validate a complete set of RGB faces.
    ///
    /// # Errors
    ///
    /// [`CubemapError::EmptyFace`] if any face has a zero dimension.
    pub fn new(images: FaceMap<RgbImage>) -> Result<Self, CubemapError> {
        for (face, image) in images.iter() {
            if image.width() == 0 || image.height() == 0 {
                return Err(CubemapError::EmptyFace {
                    face,
                    width: image.width(),
                    height: image.height(),
                });
            }
        }
        Ok(Self { images })
    }

    /// Assemble a set from `(face, image)` pairs in any order. Alpha is dropped.
    ///
    /// # Errors
    ///
    /// [`CubemapError::MissingFace`] or [`CubemapError::DuplicateFace`] when the
    /// pairs do not name every face exactly once, and [`CubemapError::EmptyFace`]
    /// for zero-sized images.
    pub fn from_images(
        images: impl IntoIterator<Item = (CubeFace, DynamicImage)>,
    ) -> Result<Self, CubemapError> {
        let mut slots: Vec<Option<RgbImage>> = vec![None; CubeFace::ALL.len()];
        for (face, image) in images {
            let slot = &mut slots[face.index()];
            if slot.is_some() {
                return Err(CubemapError::DuplicateFace { face });
            }
            *slot = Some(image.into_rgb8());
        }
        let images = FaceMap::try_from_fn(|face| {
            slots[face.index()]
                .take()
                .ok_or(CubemapError::MissingFace { face })
        })?;
        Self::new(images)
    }

    /// Decode all six faces from disk.
    ///
    /// # Errors
    ///
    /// [`CubemapError::ResourceUnavailable`] naming the first face that fails to
    /// load, or [`CubemapError::EmptyFace`].
    pub fn load(paths: &FaceMap<PathBuf>) -> Result<Self, CubemapError> {
        let images = paths.try_map(|face, path| load_face(face, path))?;
        Self::new(images)
    }

    /// The image for `face`.
    #[inline]
    #[must_use]
    pub fn image(&self, face: CubeFace) -> &RgbImage {
        self.images.get(face)
    }

    /// Nearest-neighbor color at `coord` on its face.
    #[inline]
    #[must_use]
    pub fn sample(&self, coord: &FaceCoord) -> Rgb<u8> {
        let image = self.image(coord.face);
        let (px, py) = texel_index(coord.u, coord.v, image.width(), image.height());
        *image.get_pixel(px, py)
    }
}

fn load_face(face: CubeFace, path: &Path) -> Result<RgbImage, CubemapError> {
    let image = image::open(path).map_err(|source| CubemapError::ResourceUnavailable {
        face,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded {face} face {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.into_rgb8())
}

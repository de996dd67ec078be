//! Error types for loading, projecting and writing cubemap images.

use std::path::PathBuf;

use cubepano_projection::{CubeFace, ProjectionError};

/// Coarse classification of a [`CubemapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied something unusable (dimensions, faces, ranges).
    InvalidInput,
    /// A face image could not be read or decoded.
    ResourceUnavailable,
    /// An output image could not be written.
    Output,
    /// The projection produced a direction it cannot map.
    NumericDegenerate,
    /// The worker pool could not be started.
    Internal,
}

/// Errors produced while building panoramas and skybox crosses.
#[derive(Debug, thiserror::Error)]
pub enum CubemapError {
    /// Output width or height is zero or too large to allocate.
    #[error("invalid output dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A face image has a zero dimension.
    #[error("{face} face image is empty ({width}x{height})")]
    EmptyFace {
        /// The offending face.
        face: CubeFace,
        /// Its width.
        width: u32,
        /// Its height.
        height: u32,
    },

    /// A face image was not supplied.
    #[error("missing {face} face image")]
    MissingFace {
        /// The absent face.
        face: CubeFace,
    },

    /// The same face was supplied more than once.
    #[error("{face} face image supplied more than once")]
    DuplicateFace {
        /// The repeated face.
        face: CubeFace,
    },

    /// The frame range is empty.
    #[error("invalid frame range {start}..={end}")]
    InvalidRange {
        /// First frame index.
        start: u32,
        /// Last frame index.
        end: u32,
    },

    /// A sequence path template could not be parsed.
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate {
        /// The template as given.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The skybox cross face size is zero or too large.
    #[error("invalid skybox face size {0}")]
    InvalidFaceSize(u32),

    /// A face image could not be loaded.
    #[error("failed to load {face} face from {}: {source}", path.display())]
    ResourceUnavailable {
        /// Which face was being loaded.
        face: CubeFace,
        /// Where it was loaded from.
        path: PathBuf,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },

    /// An output image could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// The encoder error.
        #[source]
        source: image::ImageError,
    },

    /// A viewing direction could not be mapped onto the cube.
    #[error("projection failed: {0}")]
    Degenerate(#[from] ProjectionError),

    /// A frame of a sequence failed.
    #[error("frame {index}: {source}")]
    Frame {
        /// The failing frame index.
        index: u32,
        /// Why it failed.
        #[source]
        source: Box<CubemapError>,
    },

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Worker(#[source] std::io::Error),
}

impl CubemapError {
    /// Classify this error. Frame wrappers report the kind of their cause.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions { .. }
            | Self::EmptyFace { .. }
            | Self::MissingFace { .. }
            | Self::DuplicateFace { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidTemplate { .. }
            | Self::InvalidFaceSize(_) => ErrorKind::InvalidInput,
            Self::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
            Self::Encode { .. } => ErrorKind::Output,
            Self::Degenerate(_) => ErrorKind::NumericDegenerate,
            Self::Frame { source, .. } => source.kind(),
            Self::Worker(_) => ErrorKind::Internal,
        }
    }

    /// Wrap this error with the sequence frame it belongs to.
    #[must_use]
    pub fn in_frame(self, index: u32) -> Self {
        Self::Frame {
            index,
            source: Box::new(self),
        }
    }
}

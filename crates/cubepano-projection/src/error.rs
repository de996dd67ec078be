//! Projection error types.

use glam::DVec3;

/// Errors raised by the checked projection entry points.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// The direction is too short to pick a face from.
    #[error("degenerate direction {direction} (length {length:e})")]
    DegenerateDirection {
        /// The offending vector.
        direction: DVec3,
        /// Its length.
        length: f64,
    },
}

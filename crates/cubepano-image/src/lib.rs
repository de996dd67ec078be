//! Image side of the cubemap → equirectangular converter.
//!
//! Holds validated cube face sets, the nearest-neighbor sampler, the frame
//! assembler (single frame and frame sequences), sequence path templates and
//! the Unity skybox cross composer.

mod assemble;
mod cross;
mod error;
mod faces;
mod sampler;
mod sequence;
mod template;

pub use assemble::{RenderOptions, render_equirect, save_image};
pub use cross::{CROSS_LAYOUT, compose_skybox_cross};
pub use error::{CubemapError, ErrorKind};
pub use faces::{CubeFaces, FaceMap};
pub use sampler::{sample_nearest, texel_index};
pub use sequence::{FrameOutcome, SequenceJob, render_frame_file, run_sequence};
pub use template::PathTemplate;

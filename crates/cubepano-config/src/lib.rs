//! Configuration for the cubepano converter.
//!
//! Settings persist to disk as a RON file and are overridden by command-line
//! flags parsed with clap.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, Command, CrossArgs, EquirectArgs, FaceArgs};
pub use config::{
    Config, CrossConfig, DebugConfig, OutputConfig, ProjectionConfig, SequenceConfig,
    MAX_THREADS,
};
pub use error::ConfigError;

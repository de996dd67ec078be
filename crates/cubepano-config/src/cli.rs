//! Command-line argument parsing for the cubepano converter.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use cubepano_projection::OrientationConvention;

use crate::Config;

/// Cubemap to equirectangular panorama converter.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "cubepano", version, disable_version_flag = true)]
pub struct CliArgs {
    /// Print version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: (),

    /// Verbose output (debug log level).
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Worker threads (1-64).
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub threads: Option<u32>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Converter operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project six cube faces into an equirectangular panorama.
    Equirect(EquirectArgs),
    /// Lay six cube faces out as a skybox cross.
    Cross(CrossArgs),
}

/// The six face image paths, in command-line order.
///
/// In sequence mode each path may carry a `%d` style frame placeholder.
#[derive(Args, Debug, Clone)]
pub struct FaceArgs {
    /// Front face image.
    pub front: String,
    /// Back face image.
    pub back: String,
    /// Left face image.
    pub left: String,
    /// Right face image.
    pub right: String,
    /// Top face image.
    pub top: String,
    /// Bottom face image.
    pub bottom: String,
}

impl FaceArgs {
    /// Paths as `[front, back, left, right, top, bottom]`.
    pub fn ordered(&self) -> [&str; 6] {
        [
            self.front.as_str(),
            self.back.as_str(),
            self.left.as_str(),
            self.right.as_str(),
            self.top.as_str(),
            self.bottom.as_str(),
        ]
    }
}

/// Arguments of `cubepano equirect`.
#[derive(Args, Debug)]
pub struct EquirectArgs {
    #[command(flatten)]
    pub faces: FaceArgs,

    /// Output resolution.
    #[arg(short, long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub resolution: Option<Vec<u32>>,

    /// Output file, or a `%d` template in sequence mode.
    #[arg(short, long)]
    pub output: Option<String>,

    /// First frame of a sequence.
    #[arg(long, requires = "end")]
    pub start: Option<u32>,

    /// Last frame of a sequence (inclusive).
    #[arg(long, requires = "start")]
    pub end: Option<u32>,

    /// Face orientation convention (canonical, upright).
    #[arg(long)]
    pub convention: Option<OrientationConvention>,

    /// Stop converting a sequence at the first failing frame.
    #[arg(long)]
    pub fail_fast: bool,
}

impl EquirectArgs {
    /// The inclusive frame range when both ends were given.
    pub fn frame_range(&self) -> Option<(u32, u32)> {
        self.start.zip(self.end)
    }
}

/// Arguments of `cubepano cross`.
#[derive(Args, Debug)]
pub struct CrossArgs {
    #[command(flatten)]
    pub faces: FaceArgs,

    /// Edge length of each face in the cross.
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Output file.
    #[arg(short, long)]
    pub output: Option<String>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        } else if args.verbose {
            self.debug.log_level = "debug".to_string();
        }
        if let Some(threads) = args.threads {
            self.projection.threads = threads;
            self.sequence.workers = threads;
        }

        match &args.command {
            Command::Equirect(equirect) => {
                if let Some([w, h]) = equirect.resolution.as_deref() {
                    self.output.width = *w;
                    self.output.height = *h;
                }
                if let Some(ref path) = equirect.output {
                    self.output.path = path.clone();
                }
                if let Some(convention) = equirect.convention {
                    self.projection.convention = convention;
                }
                if equirect.fail_fast {
                    self.sequence.fail_fast = true;
                }
            }
            Command::Cross(cross) => {
                if let Some(size) = cross.size {
                    self.cross.face_size = size;
                }
                if let Some(ref path) = cross.output {
                    self.cross.path = path.clone();
                }
            }
        }
    }
}

//! `cubepano` command-line converter.
//!
//! Configuration is loaded from `config.ron` and overridden via CLI flags.
//!
//! ```text
//! cubepano equirect front.png back.png left.png right.png top.png bottom.png -r 2048 1024
//! cubepano equirect f_%04d.png b_%04d.png l_%04d.png r_%04d.png u_%04d.png d_%04d.png \
//!     --start 1 --end 240 -o pano_%04d.png
//! cubepano cross front.png back.png left.png right.png top.png bottom.png -s 256
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cubepano_config::{CliArgs, Command, Config, ConfigError, CrossArgs, EquirectArgs, FaceArgs};
use cubepano_image::{
    CubeFaces, CubemapError, FaceMap, PathTemplate, RenderOptions, SequenceJob,
    compose_skybox_cross, render_frame_file, run_sequence, save_image,
};
use tracing::{error, info};

const CONFIG_DIR_NAME: &str = "cubepano";

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cubemap(#[from] CubemapError),

    #[error("{failed} of {total} frames failed")]
    FramesFailed { failed: usize, total: usize },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().or_else(|| {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
    });

    // Load or create config, then apply CLI overrides
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    cubepano_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    match run(&args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, config: &Config) -> Result<(), AppError> {
    config.validate()?;
    match command {
        Command::Equirect(args) => equirect(args, config),
        Command::Cross(args) => cross(args, config),
    }
}

fn face_map(faces: &FaceArgs) -> FaceMap<&str> {
    let [front, back, left, right, top, bottom] = faces.ordered();
    FaceMap::from_ordered(front, back, left, right, top, bottom)
}

fn equirect(args: &EquirectArgs, config: &Config) -> Result<(), AppError> {
    let options = RenderOptions::new(config.output.width, config.output.height)
        .with_convention(config.projection.convention)
        .with_threads(config.projection.threads as usize);
    let faces = face_map(&args.faces);

    let Some((start, end)) = args.frame_range() else {
        let output = Path::new(&config.output.path);
        render_frame_file(&faces.map(|_, path| PathBuf::from(path)), output, &options)?;
        return Ok(());
    };

    let templates = faces.try_map(|_, raw| PathTemplate::parse(raw))?;
    let mut job = SequenceJob::new(
        templates,
        PathTemplate::parse(&config.output.path)?,
        start,
        end,
    );
    job.render = options;
    job.fail_fast = config.sequence.fail_fast;
    job.workers = config.sequence.workers as usize;

    let outcomes = run_sequence(&job)?;
    let total = outcomes.len();
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!("Converted {} of {total} frames", total - failed);

    if failed > 0 {
        return Err(AppError::FramesFailed { failed, total });
    }
    Ok(())
}

fn cross(args: &CrossArgs, config: &Config) -> Result<(), AppError> {
    let paths = face_map(&args.faces).map(|_, path| PathBuf::from(path));
    let faces = CubeFaces::load(&paths)?;
    let cross = compose_skybox_cross(&faces, config.cross.face_size)?;
    save_image(&cross, Path::new(&config.cross.path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    const NAMES: [&str; 6] = ["front", "back", "left", "right", "top", "bottom"];

    fn write_faces(dir: &Path, suffix: &str) -> Vec<String> {
        NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let path = dir.join(format!("{name}{suffix}.png"));
                RgbImage::from_pixel(8, 8, Rgb([i as u8 * 40, 0, 0]))
                    .save(&path)
                    .unwrap();
                path.to_str().unwrap().to_string()
            })
            .collect()
    }

    fn parse(subcommand: &str, faces: &[String], flags: &[&str]) -> (CliArgs, Config) {
        let mut argv = vec!["cubepano".to_string(), subcommand.to_string()];
        argv.extend(faces.iter().cloned());
        argv.extend(flags.iter().map(|f| f.to_string()));
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        (args, config)
    }

    #[test]
    fn test_single_frame() {
        let dir = tempfile::tempdir().unwrap();
        let faces = write_faces(dir.path(), "");
        let output = dir.path().join("pano.png");
        let (args, config) = parse(
            "equirect",
            &faces,
            &["-r", "32", "16", "-o", output.to_str().unwrap()],
        );

        run(&args.command, &config).unwrap();
        assert_eq!(image::open(&output).unwrap().into_rgb8().dimensions(), (32, 16));
    }

    #[test]
    fn test_sequence_reports_failed_frames() {
        let dir = tempfile::tempdir().unwrap();
        write_faces(dir.path(), "_0");
        let templates: Vec<String> = NAMES
            .iter()
            .map(|name| dir.path().join(format!("{name}_%d.png")).to_str().unwrap().to_string())
            .collect();
        let output = dir.path().join("pano_%d.png");
        let (args, config) = parse(
            "equirect",
            &templates,
            &["-r", "8", "4", "-o", output.to_str().unwrap(), "--start", "0", "--end", "1"],
        );

        let err = run(&args.command, &config).unwrap_err();
        assert!(matches!(err, AppError::FramesFailed { failed: 1, total: 2 }));
        assert!(dir.path().join("pano_0.png").exists());
        assert!(!dir.path().join("pano_1.png").exists());
    }

    #[test]
    fn test_cross() {
        let dir = tempfile::tempdir().unwrap();
        let faces = write_faces(dir.path(), "");
        let output = dir.path().join("sky.png");
        let (args, config) = parse("cross", &faces, &["-s", "4", "-o", output.to_str().unwrap()]);

        run(&args.command, &config).unwrap();
        assert_eq!(image::open(&output).unwrap().into_rgb8().dimensions(), (16, 12));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let faces = write_faces(dir.path(), "");
        let (args, mut config) = parse("cross", &faces, &[]);
        config.cross.face_size = 0;
        assert!(matches!(run(&args.command, &config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_face_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut faces = write_faces(dir.path(), "");
        faces[2] = dir.path().join("nope.png").to_str().unwrap().to_string();
        let (args, config) = parse("equirect", &faces, &["-o", "unused.png"]);
        let err = run(&args.command, &config).unwrap_err();
        assert!(matches!(
            err,
            AppError::Cubemap(CubemapError::ResourceUnavailable { .. })
        ));
    }
}

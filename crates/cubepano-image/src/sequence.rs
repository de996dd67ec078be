//! Frame sequences: one panorama per frame index, rendered on a worker pool.
//!
//! Each frame loads its own six faces and writes its own output; nothing is
//! shared between frames except the read-only job description.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{bounded, unbounded};
use tracing::{debug, info, warn};

use crate::{
    CubeFaces, CubemapError, FaceMap, PathTemplate, RenderOptions, render_equirect, save_image,
};

/// A numbered sequence of cubemaps to convert.
#[derive(Clone, Debug)]
pub struct SequenceJob {
    /// Path template for each face.
    pub faces: FaceMap<PathTemplate>,
    /// Path template for the panoramas.
    pub output: PathTemplate,
    /// First frame index (inclusive).
    pub start: u32,
    /// Last frame index (inclusive).
    pub end: u32,
    /// Per-frame render settings.
    pub render: RenderOptions,
    /// Stop at the first failing frame instead of reporting every frame.
    pub fail_fast: bool,
    /// Frame worker threads; 0 picks the CPU count.
    pub workers: usize,
}

/// What happened to one frame of a sequence.
#[derive(Debug)]
pub struct FrameOutcome {
    /// The frame index.
    pub index: u32,
    /// The written panorama path, or the error naming this frame.
    pub result: Result<PathBuf, CubemapError>,
}

impl SequenceJob {
    /// A job over `start..=end` with default render settings.
    #[must_use]
    pub fn new(faces: FaceMap<PathTemplate>, output: PathTemplate, start: u32, end: u32) -> Self {
        Self {
            faces,
            output,
            start,
            end,
            render: RenderOptions::default(),
            fail_fast: false,
            workers: 0,
        }
    }

    /// Face paths for frame `index`.
    #[must_use]
    pub fn face_paths(&self, index: u32) -> FaceMap<PathBuf> {
        self.faces.map(|_, template| template.render(index))
    }

    /// Panorama path for frame `index`.
    #[must_use]
    pub fn output_path(&self, index: u32) -> PathBuf {
        self.output.render(index)
    }

    fn frame_count(&self) -> Result<usize, CubemapError> {
        if self.start > self.end {
            return Err(CubemapError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok((self.end - self.start) as usize + 1)
    }
}

/// Load six faces, render one panorama and write it to `output`.
///
/// # Errors
///
/// Any load, render or encode error, unwrapped.
pub fn render_frame_file(
    paths: &FaceMap<PathBuf>,
    output: &Path,
    options: &RenderOptions,
) -> Result<(), CubemapError> {
    let faces = CubeFaces::load(paths)?;
    let image = render_equirect(&faces, options)?;
    save_image(&image, output)
}

fn render_sequence_frame(
    job: &SequenceJob,
    index: u32,
    options: &RenderOptions,
) -> Result<PathBuf, CubemapError> {
    let output = job.output_path(index);
    render_frame_file(&job.face_paths(index), &output, options).map_err(|e| e.in_frame(index))?;
    Ok(output)
}

/// Render every frame of `job`.
///
/// Outcomes are returned sorted by frame index. Without `fail_fast` every
/// frame is attempted and failures are reported in their outcome. With
/// `fail_fast` no new frames start after the first failure and the failure
/// with the lowest index is returned as the error.
///
/// # Errors
///
/// [`CubemapError::InvalidRange`] if `start > end`, [`CubemapError::Worker`]
/// if no worker can be spawned, and with `fail_fast` the first frame error
/// (wrapped in [`CubemapError::Frame`]).
pub fn run_sequence(job: &SequenceJob) -> Result<Vec<FrameOutcome>, CubemapError> {
    let frame_count = job.frame_count()?;
    let requested = if job.workers == 0 {
        num_cpus::get()
    } else {
        job.workers
    };
    let workers = requested.clamp(1, frame_count);
    // With several frames in flight, each frame renders on its worker alone.
    let options = if workers > 1 {
        job.render.with_threads(1)
    } else {
        job.render
    };

    info!(
        "Converting frames {}..={} with {workers} workers",
        job.start, job.end
    );
    if !job.output.has_placeholder() {
        info!("Output {} has no frame placeholder, appending _N", job.output);
    }

    let abort = AtomicBool::new(false);
    let mut outcomes = std::thread::scope(|scope| -> Result<Vec<FrameOutcome>, CubemapError> {
        let (task_sender, task_receiver) = bounded::<u32>(workers * 2);
        let (result_sender, result_receiver) = unbounded::<FrameOutcome>();

        for worker in 0..workers {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let abort = &abort;
            let options = &options;
            std::thread::Builder::new()
                .name(format!("sequence-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    while let Ok(index) = receiver.recv() {
                        if abort.load(Ordering::Relaxed) {
                            continue;
                        }
                        let result = render_sequence_frame(job, index, options);
                        if let Err(e) = &result {
                            warn!("{e}");
                            if job.fail_fast {
                                abort.store(true, Ordering::Relaxed);
                            }
                        }
                        if sender.send(FrameOutcome { index, result }).is_err() {
                            break;
                        }
                    }
                })
                .map_err(CubemapError::Worker)?;
        }
        drop(task_receiver);
        drop(result_sender);

        for index in job.start..=job.end {
            if abort.load(Ordering::Relaxed) {
                debug!("Stopping sequence before frame {index}");
                break;
            }
            if task_sender.send(index).is_err() {
                break;
            }
        }
        drop(task_sender);

        Ok(result_receiver.iter().collect())
    })?;

    outcomes.sort_by_key(|o| o.index);

    if job.fail_fast
        && let Some(pos) = outcomes.iter().position(|o| o.result.is_err())
    {
        return outcomes.swap_remove(pos).result.map(|_| Vec::new());
    }

    Ok(outcomes)
}

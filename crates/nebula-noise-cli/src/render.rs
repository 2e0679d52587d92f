//! Parallel grid sampling and PNG output.
//!
//! Rows of the grid are queued on a bounded channel and pulled by a pool of
//! named worker threads. Each worker sends back `(row, values)`; the caller
//! reassembles them in row order, so the image is identical for any thread
//! count.

use std::path::Path;

use crossbeam_channel::{bounded, unbounded};
use nebula_noise::NoiseField;
use nebula_noise::grid::{GridSpec, ValueRange, sample_rows, value_range};
use tracing::{debug, info};

/// Errors raised while rendering a field to an image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Width or height is zero.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A worker thread could not be started.
    #[error("failed to spawn render worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// A row was never delivered by the pool.
    #[error("render worker exited before finishing row {0}")]
    MissingRow(u32),

    /// Every sample was NaN or infinite.
    #[error("field produced no finite samples")]
    NoFiniteSamples,

    /// The output directory could not be created.
    #[error("failed to create output directory: {0}")]
    OutputDir(#[source] std::io::Error),

    /// Encoding or writing the image failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Outcome of a successful render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSummary {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Raw sample statistics before mapping to grayscale.
    pub range: ValueRange,
    /// Worker threads used.
    pub threads: usize,
}

/// Worker count for a configured value; `0` means one per CPU.
pub fn resolve_threads(configured: usize) -> usize {
    if configured == 0 {
        num_cpus::get().max(1)
    } else {
        configured
    }
}

/// Sample every point of `spec` on `threads` workers, row-major.
pub fn sample_parallel(
    field: &dyn NoiseField,
    spec: &GridSpec,
    threads: usize,
) -> Result<Vec<f32>, RenderError> {
    if spec.is_empty() {
        return Err(RenderError::InvalidDimensions {
            width: spec.width,
            height: spec.height,
        });
    }
    let threads = threads.clamp(1, spec.height as usize);
    debug!(threads, rows = spec.height, "sampling grid");

    let (row_sender, row_receiver) = bounded::<u32>(spec.height as usize);
    let (result_sender, result_receiver) = unbounded::<(u32, Vec<f32>)>();
    for y in 0..spec.height {
        // Capacity equals the row count and the receiver is alive.
        row_sender
            .send(y)
            .map_err(|_| RenderError::MissingRow(y))?;
    }
    drop(row_sender);

    let mut rows: Vec<Option<Vec<f32>>> = vec![None; spec.height as usize];
    std::thread::scope(|scope| -> Result<(), RenderError> {
        for worker in 0..threads {
            let receiver = row_receiver.clone();
            let sender = result_sender.clone();
            std::thread::Builder::new()
                .name(format!("render-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    while let Ok(y) = receiver.recv() {
                        let values = sample_rows(spec, y..y + 1, |p| field.sample_2d(p));
                        if sender.send((y, values)).is_err() {
                            break;
                        }
                    }
                })
                .map_err(RenderError::Spawn)?;
        }
        drop(result_sender);

        for (y, values) in result_receiver.iter() {
            rows[y as usize] = Some(values);
        }
        Ok(())
    })?;

    let mut samples = Vec::with_capacity(spec.len());
    for (y, row) in rows.into_iter().enumerate() {
        samples.extend(row.ok_or(RenderError::MissingRow(y as u32))?);
    }
    Ok(samples)
}

/// Map samples to 8-bit gray levels, stretching `range` over `0..=255`.
pub fn to_gray_levels(samples: &[f32], range: &ValueRange) -> Vec<u8> {
    samples
        .iter()
        .map(|&v| (range.normalize(v) * 255.0).round() as u8)
        .collect()
}

/// Render `field` over `spec` and write a grayscale image to `output`.
pub fn render_to_file(
    field: &dyn NoiseField,
    spec: &GridSpec,
    threads: usize,
    output: &Path,
) -> Result<RenderSummary, RenderError> {
    let threads = resolve_threads(threads);
    let start = std::time::Instant::now();
    let samples = sample_parallel(field, spec, threads)?;
    let range = value_range(&samples).ok_or(RenderError::NoFiniteSamples)?;
    debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        min = range.min,
        max = range.max,
        "grid sampled"
    );

    let image = image::GrayImage::from_raw(spec.width, spec.height, to_gray_levels(&samples, &range))
        .ok_or(RenderError::InvalidDimensions {
            width: spec.width,
            height: spec.height,
        })?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(RenderError::OutputDir)?;
    }
    image.save(output)?;
    info!(path = %output.display(), width = spec.width, height = spec.height, "image written");

    Ok(RenderSummary {
        width: spec.width,
        height: spec.height,
        range,
        threads: threads.min(spec.height as usize),
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use nebula_noise::grid::sample_grid;
    use nebula_noise::{NoiseHasher, Perlin};

    use super::*;

    fn perlin() -> Perlin<u64> {
        Perlin::new(NoiseHasher::from_seed(31))
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let field = perlin();
        let spec = GridSpec::centered(37, 23, Vec2::ZERO, 6.0);
        let sequential = sample_grid(&spec, |p| field.sample_2d(p));
        for threads in [1, 3, 8, 64] {
            let parallel = sample_parallel(&field, &spec, threads).unwrap();
            assert_eq!(parallel, sequential, "{threads} workers changed the output");
        }
    }

    #[test]
    fn test_empty_grid_rejected() {
        let spec = GridSpec::new(0, 10, Vec2::ZERO, 1.0);
        let result = sample_parallel(&perlin(), &spec, 2);
        assert!(matches!(
            result,
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_gray_levels_span_range() {
        let samples = [-1.0, 0.0, 1.0];
        let range = value_range(&samples).unwrap();
        assert_eq!(to_gray_levels(&samples, &range), vec![0, 128, 255]);
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("perlin.png");
        let spec = GridSpec::centered(16, 8, Vec2::ZERO, 4.0);
        let summary = render_to_file(&perlin(), &spec, 2, &output).unwrap();
        assert_eq!((summary.width, summary.height), (16, 8));
        assert!(summary.range.min < summary.range.max);

        let written = image::open(&output).unwrap().into_luma8();
        assert_eq!(written.dimensions(), (16, 8));
        assert!(written.pixels().any(|p| p.0[0] == 0), "darkest sample maps to black");
        assert!(written.pixels().any(|p| p.0[0] == 255), "brightest sample maps to white");
    }

    #[test]
    fn test_resolve_threads() {
        assert_eq!(resolve_threads(3), 3);
        assert!(resolve_threads(0) >= 1);
    }
}

use std::time::Instant;

use gaussblur_image::{ImageError, Rgba32fImage, Rgba8Image};

use crate::{
    error::BlurError,
    filter::{horizontal_pass, kernels::GaussianKernel, vertical_pass},
    parallel::{self, RowRange},
};

/// Parameters of a blur invocation.
///
/// # Examples
///
/// ```
/// use gaussblur_imgproc::BlurConfig;
///
/// let config = BlurConfig::default().with_sigma(2.5).with_num_threads(4);
/// assert!(config.validate().is_ok());
/// assert!(config.with_num_threads(0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurConfig {
    /// The standard deviation of the gaussian, in pixels.
    pub sigma: f32,
    /// The number of workers each pass is split into.
    pub num_threads: usize,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl BlurConfig {
    /// Create a new configuration.
    pub fn new(sigma: f32, num_threads: usize) -> Self {
        Self { sigma, num_threads }
    }

    /// Set the sigma of the gaussian.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the number of workers.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Check the parameters without running anything.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::InvalidSigma`] if sigma is not positive and finite, and
    /// [`BlurError::InvalidThreadCount`] if the number of workers is zero.
    pub fn validate(&self) -> Result<(), BlurError> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(BlurError::InvalidSigma(self.sigma));
        }
        if self.num_threads == 0 {
            return Err(BlurError::InvalidThreadCount(self.num_threads));
        }
        Ok(())
    }
}

/// Time spent by one worker in both passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerTiming {
    /// Index of the worker.
    pub worker: usize,
    /// Rows processed by the worker in both passes.
    pub rows: RowRange,
    /// Wall-clock time of the horizontal pass in milliseconds.
    pub horizontal_ms: f64,
    /// Wall-clock time of the vertical pass in milliseconds.
    pub vertical_ms: f64,
}

impl WorkerTiming {
    /// Time spent in both passes in milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.horizontal_ms + self.vertical_ms
    }
}

/// Per worker timings of one blur invocation, indexed by worker id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimingRecord {
    workers: Vec<WorkerTiming>,
}

impl TimingRecord {
    fn new(ranges: &[RowRange], horizontal_ms: &[f64], vertical_ms: &[f64]) -> Self {
        let workers = ranges
            .iter()
            .zip(horizontal_ms.iter().zip(vertical_ms))
            .enumerate()
            .map(|(worker, (&rows, (&horizontal_ms, &vertical_ms)))| WorkerTiming {
                worker,
                rows,
                horizontal_ms,
                vertical_ms,
            })
            .collect();
        Self { workers }
    }

    /// The timings ordered by worker id.
    pub fn as_slice(&self) -> &[WorkerTiming] {
        &self.workers
    }

    /// The number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the record holds no worker.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// The timing of the given worker.
    pub fn worker(&self, id: usize) -> Option<&WorkerTiming> {
        self.workers.get(id)
    }

    /// The total time of every worker in milliseconds, ordered by worker id.
    pub fn durations_ms(&self) -> Vec<f64> {
        self.workers.iter().map(WorkerTiming::total_ms).collect()
    }

    /// The sum of the time spent by all the workers.
    pub fn total_ms(&self) -> f64 {
        self.workers.iter().map(WorkerTiming::total_ms).sum()
    }

    /// The time spent by the slowest worker.
    pub fn max_ms(&self) -> f64 {
        self.workers
            .iter()
            .map(WorkerTiming::total_ms)
            .fold(0.0, f64::max)
    }
}

/// The result of a blur invocation.
#[derive(Debug, Clone)]
pub struct BlurOutput {
    /// The blurred image, same size as the input.
    pub image: Rgba8Image,
    /// How long every worker took.
    pub timings: TimingRecord,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Horizontal,
    Vertical,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Phase::Horizontal => write!(f, "horizontal"),
            Phase::Vertical => write!(f, "vertical"),
        }
    }
}

/// Run one pass with a worker per row range and wait for all of them.
///
/// Each worker owns the slice of `dst` covering its rows. Returns the elapsed time of every
/// worker in milliseconds.
fn run_phase<T, F>(
    pool: &rayon::ThreadPool,
    phase: Phase,
    dst: &mut [T],
    row_stride: usize,
    ranges: &[RowRange],
    op: F,
) -> Result<Vec<f64>, BlurError>
where
    T: Send,
    F: Fn(&mut [T], RowRange) -> Result<(), ImageError> + Sync,
{
    let slices = parallel::split_rows_mut(dst, row_stride, ranges)?;
    let mut elapsed_ms = vec![0.0f64; ranges.len()];
    let mut status: Vec<Result<(), ImageError>> = ranges.iter().map(|_| Ok(())).collect();

    let op = &op;
    let jobs = slices
        .into_iter()
        .zip(ranges)
        .zip(elapsed_ms.iter_mut().zip(status.iter_mut()))
        .enumerate();

    pool.scope(move |s| {
        for (worker, ((dst_rows, &rows), (elapsed, result))) in jobs {
            s.spawn(move |_| {
                let start = Instant::now();
                *result = op(dst_rows, rows);
                *elapsed = start.elapsed().as_secs_f64() * 1e3;
                log::trace!("{phase} worker {worker} rows {rows}: {:.3} ms", *elapsed);
            });
        }
    });

    status.into_iter().collect::<Result<(), ImageError>>()?;

    Ok(elapsed_ms)
}

/// Blur an RGBA image with a separable gaussian filter split across worker threads.
///
/// The rows are partitioned once and both passes use the same partition. The horizontal pass
/// writes an unclamped floating point intermediate image; the vertical pass only starts after
/// every horizontal worker has finished and writes the final 8-bit image. Borders replicate
/// the edge pixels.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 4).
/// * `config` - The sigma and the number of workers.
///
/// # Returns
///
/// The blurred image together with the time every worker spent in both passes.
///
/// # Errors
///
/// The sigma, the number of workers and the image size are validated before any worker is
/// spawned. See [`BlurConfig::validate`] and [`BlurError::EmptyImage`].
///
/// # Examples
///
/// ```
/// use gaussblur_image::Rgba8Image;
/// use gaussblur_imgproc::{gaussian_blur_rgba, BlurConfig};
///
/// let img = Rgba8Image::from_size_val([8, 6].into(), 128).unwrap();
/// let out = gaussian_blur_rgba(&img, &BlurConfig::new(1.5, 3)).unwrap();
///
/// assert_eq!(out.image, img);
/// assert_eq!(out.timings.len(), 3);
/// ```
pub fn gaussian_blur_rgba(
    src: &Rgba8Image,
    config: &BlurConfig,
) -> Result<BlurOutput, BlurError> {
    config.validate()?;

    let size = src.size();
    if size.is_empty() {
        return Err(BlurError::EmptyImage(size));
    }

    let kernel = GaussianKernel::new(config.sigma)?;
    let ranges = parallel::partition_rows(size.height, config.num_threads)?;
    log::trace!(
        "blurring {size} with sigma {} ({} taps) over {} workers",
        config.sigma,
        kernel.len(),
        ranges.len()
    );

    let pool = parallel::fixed_thread_pool(config.num_threads)?;
    let row_stride = src.row_stride();

    let mut intermediate = Rgba32fImage::from_size_val(size, 0.0)?;
    let horizontal_ms = run_phase(
        &pool,
        Phase::Horizontal,
        intermediate.as_slice_mut(),
        row_stride,
        &ranges,
        |dst, rows| horizontal_pass(src, dst, rows, &kernel),
    )?;

    // every row of the intermediate image is written at this point
    let mut dst = Rgba8Image::from_size_val(size, 0)?;
    let vertical_ms = run_phase(
        &pool,
        Phase::Vertical,
        dst.as_slice_mut(),
        row_stride,
        &ranges,
        |out, rows| vertical_pass(&intermediate, out, rows, &kernel),
    )?;
    drop(intermediate);

    let timings = TimingRecord::new(&ranges, &horizontal_ms, &vertical_ms);
    for timing in timings.as_slice() {
        log::debug!("Thread {} time: {:.3} ms", timing.worker, timing.total_ms());
    }
    log::debug!(
        "blurred {size} in {:.3} ms (slowest worker)",
        timings.max_ms()
    );

    Ok(BlurOutput {
        image: dst,
        timings,
    })
}

/// Blur an RGBA image with a separable gaussian filter.
///
/// Convenience wrapper around [`gaussian_blur_rgba`] that only returns the image; the per
/// worker timings are logged at debug level.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 4).
/// * `sigma` - The standard deviation of the gaussian. Must be positive.
/// * `num_threads` - The number of workers. Must be positive.
pub fn gaussian_blur(
    src: &Rgba8Image,
    sigma: f32,
    num_threads: usize,
) -> Result<Rgba8Image, BlurError> {
    let output = gaussian_blur_rgba(src, &BlurConfig::new(sigma, num_threads))?;
    Ok(output.image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaussblur_image::ImageSize;

    #[test]
    fn test_config_validate() {
        assert_eq!(BlurConfig::new(1.0, 2).validate(), Ok(()));
        assert_eq!(
            BlurConfig::new(0.0, 2).validate(),
            Err(BlurError::InvalidSigma(0.0))
        );
        assert_eq!(
            BlurConfig::new(-0.5, 2).validate(),
            Err(BlurError::InvalidSigma(-0.5))
        );
        assert!(matches!(
            BlurConfig::new(f32::NAN, 2).validate(),
            Err(BlurError::InvalidSigma(_))
        ));
        assert_eq!(
            BlurConfig::new(1.0, 0).validate(),
            Err(BlurError::InvalidThreadCount(0))
        );
    }

    #[test]
    fn test_config_default() {
        let config = BlurConfig::default();
        assert_eq!(config.sigma, 1.0);
        assert!(config.num_threads >= 1);
        assert_eq!(config.with_sigma(3.0).sigma, 3.0);
    }

    #[test]
    fn test_blur_rejects_empty_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 0,
            height: 4,
        };
        let img = Rgba8Image::new(size, vec![])?;
        assert_eq!(
            gaussian_blur(&img, 1.0, 2).map(|_| ()),
            Err(BlurError::EmptyImage(size))
        );
        Ok(())
    }

    #[test]
    fn test_blur_validates_before_running() -> Result<(), ImageError> {
        let img = Rgba8Image::from_size_val([0, 0].into(), 0)?;
        // parameters are checked before the image
        assert_eq!(
            gaussian_blur(&img, 0.0, 1).map(|_| ()),
            Err(BlurError::InvalidSigma(0.0))
        );
        assert_eq!(
            gaussian_blur(&img, 1.0, 0).map(|_| ()),
            Err(BlurError::InvalidThreadCount(0))
        );
        Ok(())
    }

    #[test]
    fn test_timing_record() -> Result<(), BlurError> {
        let img = Rgba8Image::from_size_val([5, 10].into(), 7)?;
        let output = gaussian_blur_rgba(&img, &BlurConfig::new(1.0, 3))?;
        let timings = &output.timings;

        assert_eq!(timings.len(), 3);
        assert_eq!(timings.durations_ms().len(), 3);
        for (id, timing) in timings.as_slice().iter().enumerate() {
            assert_eq!(timing.worker, id);
            assert!(timing.horizontal_ms >= 0.0);
            assert!(timing.vertical_ms >= 0.0);
        }
        assert_eq!(timings.worker(2).map(|t| t.rows), Some(RowRange::new(6, 10)));
        assert!(timings.worker(3).is_none());
        assert!(timings.max_ms() <= timings.total_ms());
        Ok(())
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Horizontal.to_string(), "horizontal");
        assert_eq!(Phase::Vertical.to_string(), "vertical");
    }
}

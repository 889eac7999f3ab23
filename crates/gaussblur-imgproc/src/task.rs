//! Run a blur in the background and hand the result back once it is done.
//!
//! The caller submits an image and a [`BlurConfig`] and gets either a [`BlurHandle`] to wait
//! on, or registers a completion callback that fires exactly once.

use std::sync::mpsc;
use std::thread::JoinHandle;

use gaussblur_image::Rgba8Image;

use crate::blur::{gaussian_blur_rgba, BlurConfig, BlurOutput};
use crate::error::BlurError;

fn check_request(src: &Rgba8Image, config: &BlurConfig) -> Result<(), BlurError> {
    config.validate()?;
    if src.size().is_empty() {
        return Err(BlurError::EmptyImage(src.size()));
    }
    Ok(())
}

/// A blur running on a background thread.
///
/// # Examples
///
/// ```
/// use gaussblur_image::Rgba8Image;
/// use gaussblur_imgproc::{task, BlurConfig};
///
/// let img = Rgba8Image::from_size_val([16, 16].into(), 10).unwrap();
/// let handle = task::spawn_blur(img, BlurConfig::new(2.0, 2)).unwrap();
///
/// let output = handle.wait().unwrap();
/// assert_eq!(output.image.size().width, 16);
/// ```
pub struct BlurHandle {
    receiver: mpsc::Receiver<Result<BlurOutput, BlurError>>,
    handle: Option<JoinHandle<()>>,
}

impl BlurHandle {
    /// Block until the blur finishes and return its result.
    ///
    /// # Errors
    ///
    /// Returns the blur error, or [`BlurError::TaskDisconnected`] if the background thread
    /// died before delivering a result.
    pub fn wait(mut self) -> Result<BlurOutput, BlurError> {
        let result = self
            .receiver
            .recv()
            .map_err(|_| BlurError::TaskDisconnected)?;

        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| BlurError::TaskDisconnected)?;
        }

        result
    }

    /// Return the result if the blur already finished, without blocking.
    ///
    /// The result is handed out once; later calls report [`BlurError::TaskDisconnected`].
    pub fn try_result(&self) -> Option<Result<BlurOutput, BlurError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(BlurError::TaskDisconnected)),
        }
    }
}

/// Submit a blur to a background thread.
///
/// The parameters and the image size are checked before the thread is spawned, so invalid
/// requests fail synchronously.
///
/// # Arguments
///
/// * `src` - The image to blur, moved into the background thread.
/// * `config` - The sigma and the number of workers.
///
/// # Returns
///
/// A handle to wait on or poll for the result.
pub fn spawn_blur(src: Rgba8Image, config: BlurConfig) -> Result<BlurHandle, BlurError> {
    check_request(&src, &config)?;

    let (tx, rx) = mpsc::channel();

    let handle = std::thread::spawn(move || {
        let result = gaussian_blur_rgba(&src, &config);
        if tx.send(result).is_err() {
            log::warn!("blur finished but nobody is waiting for the result");
        }
    });

    Ok(BlurHandle {
        receiver: rx,
        handle: Some(handle),
    })
}

/// Submit a blur to a background thread and call `on_finished` with the result.
///
/// The callback runs once, on the background thread, after both passes complete.
///
/// # Arguments
///
/// * `src` - The image to blur, moved into the background thread.
/// * `config` - The sigma and the number of workers.
/// * `on_finished` - Completion callback receiving the blurred image or the error.
///
/// # Returns
///
/// The join handle of the background thread.
pub fn spawn_blur_with<F>(
    src: Rgba8Image,
    config: BlurConfig,
    on_finished: F,
) -> Result<JoinHandle<()>, BlurError>
where
    F: FnOnce(Result<BlurOutput, BlurError>) + Send + 'static,
{
    check_request(&src, &config)?;

    Ok(std::thread::spawn(move || {
        on_finished(gaussian_blur_rgba(&src, &config));
    }))
}

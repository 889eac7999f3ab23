use argh::FromArgs;
use std::path::PathBuf;
use std::sync::mpsc;

use gaussblur::{
    imgproc::{task, BlurConfig},
    io::functional as F,
};

#[derive(FromArgs)]
/// Blur an image with a parallel separable gaussian filter
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path to write the blurred image to
    #[argh(option, short = 'o')]
    output_path: PathBuf,

    /// the sigma of the gaussian (default: 1.0)
    #[argh(option, short = 's', default = "1.0")]
    sigma: f32,

    /// the number of worker threads (default: available parallelism)
    #[argh(option, short = 't')]
    num_threads: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    // read the image
    let image = F::read_image_rgba8(&args.image_path)?;
    log::info!("loaded {} ({})", args.image_path.display(), image.size());

    let mut config = BlurConfig::default().with_sigma(args.sigma);
    if let Some(num_threads) = args.num_threads {
        config = config.with_num_threads(num_threads);
    }

    // run the blur in the background and get notified once it is done
    let (tx, rx) = mpsc::channel();
    let handle = task::spawn_blur_with(image, config, move |result| {
        if tx.send(result).is_err() {
            log::error!("the blur result receiver is gone");
        }
    })?;

    log::info!(
        "blurring with sigma {} on {} threads",
        config.sigma,
        config.num_threads
    );

    let output = rx.recv()??;
    handle
        .join()
        .map_err(|_| "the blur thread panicked".to_string())?;

    for timing in output.timings.as_slice() {
        log::info!("Thread {} time: {:.3} ms", timing.worker, timing.total_ms());
    }

    F::write_image_rgba8(&args.output_path, &output.image)?;
    log::info!("wrote {}", args.output_path.display());

    Ok(())
}

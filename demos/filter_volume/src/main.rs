use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};

use voxfilt::filter::{kernels, ExecutionStrategy, SeparableVolumeFilter};
use voxfilt::volume::{Volume, VolumeSize};

#[derive(FromArgs)]
/// Smooth a synthetic volume with a separable gaussian filter
struct Args {
    /// number of rows (Y extent)
    #[argh(option, default = "32")]
    rows: usize,

    /// number of columns (X extent)
    #[argh(option, default = "32")]
    cols: usize,

    /// number of slices (Z extent)
    #[argh(option, default = "32")]
    slices: usize,

    /// standard deviation of the gaussian kernel
    #[argh(option, short = 's', default = "2.0")]
    sigma: f64,

    /// number of threads, the global pool is used when omitted
    #[argh(option, short = 't')]
    threads: Option<usize>,

    /// fill the volume with uniform noise instead of a centered impulse
    #[argh(switch)]
    noise: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = VolumeSize {
        rows: args.rows,
        cols: args.cols,
        slices: args.slices,
    };

    let volume = if args.noise {
        let mut rng = StdRng::seed_from_u64(0);
        let data = (0..size.numel()).map(|_| rng.random_range(0.0..1.0)).collect();
        Volume::new(size, data)?
    } else {
        let mut volume = Volume::from_size_val(size, 0.0);
        volume.set(size.rows / 2, size.cols / 2, size.slices / 2, 1.0)?;
        volume
    };

    // the kernel must be long enough to mirror across the largest extent
    let extent = size.rows.max(size.cols).max(size.slices);
    let min_radius = kernels::min_kernel_len(extent) / 2;
    let mut kernel = kernels::gaussian_kernel_from_sigma(args.sigma);
    if kernel.radius() < min_radius {
        kernel = kernels::gaussian_kernel_1d(min_radius, args.sigma);
    }
    log::info!(
        "gaussian kernel: sigma {}, {} taps, sum {:.6}",
        args.sigma,
        kernel.len(),
        kernel.sum()
    );

    let strategy = match args.threads {
        Some(n) => ExecutionStrategy::Fixed(n),
        None => ExecutionStrategy::Auto,
    };

    let filter = SeparableVolumeFilter::new(kernel).with_strategy(strategy);
    log::info!("filtering {} with strategy {:?}", size, filter.strategy());

    let start = std::time::Instant::now();
    let filtered = filter.apply(&volume)?;
    let elapsed = start.elapsed();

    let data = filtered.as_slice();
    let sum = data.iter().sum::<f64>();
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    println!("volume: {}", filtered.size());
    println!("elapsed: {elapsed:?}");
    println!("input sum: {:.6}", volume.as_slice().iter().sum::<f64>());
    println!("output sum: {sum:.6}, min: {min:.6}, max: {max:.6}");

    Ok(())
}

use crate::{error::FilterError, kernel::Kernel};

/// Create a box kernel.
///
/// # Arguments
///
/// * `kernel_size` - The number of taps, must be odd.
///
/// # Returns
///
/// A kernel of `kernel_size` equal taps summing to one.
pub fn box_kernel_1d(kernel_size: usize) -> Result<Kernel, FilterError> {
    Kernel::new(vec![1.0 / kernel_size as f64; kernel_size])
}

/// Create a gaussian kernel.
///
/// # Arguments
///
/// * `radius` - The kernel radius, the kernel has `2 * radius + 1` taps.
/// * `sigma` - The standard deviation of the gaussian. A non-positive sigma gives the unit
///   impulse padded with zeros.
///
/// # Returns
///
/// A symmetric kernel normalized to sum to one.
pub fn gaussian_kernel_1d(radius: usize, sigma: f64) -> Kernel {
    let len = 2 * radius + 1;
    let mut taps = vec![0.0; len];

    if sigma <= 0.0 {
        taps[radius] = 1.0;
        return Kernel::from_odd_taps(taps);
    }

    let two_sigma_sq = 2.0 * sigma * sigma;
    for (i, tap) in taps.iter_mut().enumerate() {
        let x = i as f64 - radius as f64;
        *tap = (-(x * x) / two_sigma_sq).exp();
    }

    // normalize the kernel
    let norm = taps.iter().sum::<f64>();
    taps.iter_mut().for_each(|k| *k /= norm);
    Kernel::from_odd_taps(taps)
}

/// Create a gaussian kernel truncated at three standard deviations.
///
/// # Arguments
///
/// * `sigma` - The standard deviation of the gaussian.
pub fn gaussian_kernel_from_sigma(sigma: f64) -> Kernel {
    let radius = (3.0 * sigma).ceil().max(0.0) as usize;
    gaussian_kernel_1d(radius, sigma)
}

/// Smallest odd kernel length that covers an axis of `extent` samples.
///
/// Satisfies `2 * len - 1 >= extent`.
pub fn min_kernel_len(extent: usize) -> usize {
    ((extent + 2) / 2).max(1) | 1
}

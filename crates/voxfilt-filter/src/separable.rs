use std::time::Instant;

use voxfilt_volume::{Axis, Volume};

use crate::{
    axis::AxisConvolver, error::FilterError, kernel::Kernel, parallel::ExecutionStrategy,
};

/// The kernels of a separable filter.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelSet {
    /// The same kernel along every axis.
    Single(Kernel),
    /// One kernel per axis.
    PerAxis {
        /// Kernel applied along X (columns).
        x: Kernel,
        /// Kernel applied along Y (rows).
        y: Kernel,
        /// Kernel applied along Z (slices).
        z: Kernel,
    },
}

impl KernelSet {
    /// The kernel applied along `axis`.
    pub fn for_axis(&self, axis: Axis) -> &Kernel {
        match self {
            KernelSet::Single(kernel) => kernel,
            KernelSet::PerAxis { x, y, z } => match axis {
                Axis::X => x,
                Axis::Y => y,
                Axis::Z => z,
            },
        }
    }
}

/// A separable 3D filter that applies 1D convolutions along X, Y and Z in turn.
///
/// The passes ping-pong between two buffers sized like the input: X writes the first, Y
/// writes the second, Z writes the first again, which becomes the result.
#[derive(Clone, Debug, PartialEq)]
pub struct SeparableVolumeFilter {
    kernels: KernelSet,
    strategy: ExecutionStrategy,
}

impl SeparableVolumeFilter {
    /// Create a filter that applies `kernel` along all three axes.
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernels: KernelSet::Single(kernel),
            strategy: ExecutionStrategy::default(),
        }
    }

    /// Create a filter with one kernel per axis.
    ///
    /// # Arguments
    ///
    /// * `kernel_x` - The kernel applied along X (columns).
    /// * `kernel_y` - The kernel applied along Y (rows).
    /// * `kernel_z` - The kernel applied along Z (slices).
    pub fn per_axis(kernel_x: Kernel, kernel_y: Kernel, kernel_z: Kernel) -> Self {
        Self {
            kernels: KernelSet::PerAxis {
                x: kernel_x,
                y: kernel_y,
                z: kernel_z,
            },
            strategy: ExecutionStrategy::default(),
        }
    }

    /// Set the execution strategy used by every pass.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The kernels of the filter.
    pub fn kernels(&self) -> &KernelSet {
        &self.kernels
    }

    /// The execution strategy of the filter.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Check that the filter can be applied to `volume`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::KernelTooSmall`] if a kernel does not cover its axis and
    /// [`FilterError::NonFiniteInput`] if the volume holds a NaN or infinite sample.
    pub fn check(&self, volume: &Volume) -> Result<(), FilterError> {
        for axis in Axis::PASS_ORDER {
            let kernel = self.kernels.for_axis(axis);
            let extent = volume.size().extent(axis);
            if !kernel.covers(extent) {
                return Err(FilterError::KernelTooSmall {
                    axis,
                    kernel_len: kernel.len(),
                    extent,
                });
            }
        }

        if let Some(index) = volume.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(FilterError::NonFiniteInput(index));
        }

        Ok(())
    }

    /// Filter a volume.
    ///
    /// # Arguments
    ///
    /// * `volume` - The source volume.
    ///
    /// # Returns
    ///
    /// A new volume of the same size holding the result of the three passes.
    ///
    /// # Errors
    ///
    /// See [`SeparableVolumeFilter::check`]. A [`ExecutionStrategy::Fixed`] strategy may also
    /// fail to build its thread pool.
    pub fn apply(&self, volume: &Volume) -> Result<Volume, FilterError> {
        if let Err(e) = self.check(volume) {
            log::debug!("rejecting volume {}: {}", volume.size(), e);
            return Err(e);
        }
        self.apply_unchecked(volume)
    }

    /// Run the three passes without checking the preconditions of [`SeparableVolumeFilter::check`].
    pub(crate) fn apply_unchecked(&self, volume: &Volume) -> Result<Volume, FilterError> {
        self.strategy.install(|| self.run_passes(volume))
    }

    fn run_passes(&self, volume: &Volume) -> Volume {
        let size = volume.size();
        let start = Instant::now();

        let mut output = Volume::from_size_val(size, 0.0);
        let mut buffer = Volume::from_size_val(size, 0.0);

        let [first, second, third] = Axis::PASS_ORDER.map(|axis| {
            AxisConvolver::new(self.kernels.for_axis(axis), axis, size)
        });

        let pass = |convolver: &AxisConvolver, src: &[f64], dst: &mut [f64]| {
            let pass_start = Instant::now();
            convolver.run(src, dst, self.strategy);
            log::trace!("{} pass took {:?}", convolver.axis(), pass_start.elapsed());
        };

        pass(&first, volume.as_slice(), output.as_slice_mut());
        pass(&second, output.as_slice(), buffer.as_slice_mut());
        pass(&third, buffer.as_slice(), output.as_slice_mut());

        log::debug!(
            "filtered volume {} in {:?} (strategy: {:?})",
            size,
            start.elapsed(),
            self.strategy
        );

        output
    }
}

/// Filter a volume with the same kernel along all three axes.
///
/// Uses `ExecutionStrategy::Auto`. For explicit control, use [`SeparableVolumeFilter`].
///
/// # Arguments
///
/// * `volume` - The source volume.
/// * `kernel` - A symmetric kernel with `2 * len - 1` at least the largest volume extent.
///
/// # Examples
///
/// ```
/// use voxfilt_filter::{filter_volume, Kernel};
/// use voxfilt_volume::Volume;
///
/// let volume = Volume::from_size_val([3, 3, 3].into(), 1.0);
/// let kernel = Kernel::new(vec![0.25, 0.5, 0.25]).unwrap();
///
/// let filtered = filter_volume(&volume, &kernel).unwrap();
/// assert!(filtered.as_slice().iter().all(|&v| v == 1.0));
/// ```
pub fn filter_volume(volume: &Volume, kernel: &Kernel) -> Result<Volume, FilterError> {
    SeparableVolumeFilter::new(kernel.clone()).apply(volume)
}

/// Filter a volume with one kernel per axis.
///
/// Uses `ExecutionStrategy::Auto`. For explicit control, use [`SeparableVolumeFilter`].
///
/// # Arguments
///
/// * `volume` - The source volume.
/// * `kernel_x` - The kernel applied along X (columns).
/// * `kernel_y` - The kernel applied along Y (rows).
/// * `kernel_z` - The kernel applied along Z (slices).
pub fn filter_volume_per_axis(
    volume: &Volume,
    kernel_x: &Kernel,
    kernel_y: &Kernel,
    kernel_z: &Kernel,
) -> Result<Volume, FilterError> {
    SeparableVolumeFilter::per_axis(kernel_x.clone(), kernel_y.clone(), kernel_z.clone())
        .apply(volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_volume_constant_field() -> Result<(), FilterError> {
        let volume = Volume::from_size_val([3, 3, 3].into(), 1.0);
        let kernel = Kernel::new(vec![0.25, 0.5, 0.25])?;

        let filtered = filter_volume(&volume, &kernel)?;

        assert_eq!(filtered.size(), volume.size());
        assert_eq!(filtered.as_slice(), &[1.0; 27]);
        Ok(())
    }

    #[test]
    fn test_filter_volume_impulse() -> Result<(), FilterError> {
        let mut volume = Volume::from_size_val([3, 3, 3].into(), 0.0);
        volume.set(1, 1, 1, 64.0)?;
        let kernel = Kernel::new(vec![0.25, 0.5, 0.25])?;

        let filtered = filter_volume(&volume, &kernel)?;

        // the mirror folds both outer taps of an edge voxel onto the center, so each pass
        // turns [0, a, 0] into [a / 2, a / 2, a / 2]
        assert_eq!(filtered.as_slice(), &[8.0; 27]);
        Ok(())
    }

    #[test]
    fn test_per_axis_uses_axis_kernels() -> Result<(), FilterError> {
        // a ramp along X only changes under the X kernel
        let volume = Volume::from_size_fn([3, 5, 3].into(), |_, x, _| x as f64);
        let smooth = Kernel::new(vec![0.25, 0.5, 0.25])?;
        let identity = Kernel::new(vec![0.0, 1.0, 0.0])?;

        let along_x = filter_volume_per_axis(&volume, &smooth, &identity, &identity)?;
        let along_y = filter_volume_per_axis(&volume, &identity, &smooth, &smooth)?;

        assert_eq!(along_y, volume);
        assert_eq!(along_x.get(0, 0, 0), Some(&0.5));
        assert_eq!(along_x.get(2, 2, 2), Some(&2.0));
        assert_eq!(along_x.get(1, 4, 0), Some(&3.5));
        Ok(())
    }

    #[test]
    fn test_check_kernel_too_small() -> Result<(), FilterError> {
        let volume = Volume::from_size_val([3, 6, 3].into(), 0.0);
        let filter = SeparableVolumeFilter::new(Kernel::new(vec![0.25, 0.5, 0.25])?);
        assert_eq!(
            filter.apply(&volume),
            Err(FilterError::KernelTooSmall {
                axis: Axis::X,
                kernel_len: 3,
                extent: 6,
            })
        );
        Ok(())
    }

    #[test]
    fn test_check_non_finite() -> Result<(), FilterError> {
        let mut volume = Volume::from_size_val([3, 3, 3].into(), 0.0);
        volume.set(2, 0, 1, f64::NAN)?;
        let filter = SeparableVolumeFilter::new(Kernel::new(vec![0.25, 0.5, 0.25])?);
        assert_eq!(filter.apply(&volume), Err(FilterError::NonFiniteInput(11)));
        Ok(())
    }

    #[test]
    fn test_filter_strategies_consistency() -> Result<(), FilterError> {
        let volume = Volume::from_size_fn([6, 5, 4].into(), |y, x, z| {
            ((y * 7 + x * 3 + z * 11) % 5) as f64 - 2.0
        });
        let kernel = Kernel::new(vec![0.05, 0.25, 0.4, 0.25, 0.05])?;

        let filter = SeparableVolumeFilter::new(kernel);
        let serial = filter
            .clone()
            .with_strategy(ExecutionStrategy::Serial)
            .apply(&volume)?;
        let parallel = filter
            .clone()
            .with_strategy(ExecutionStrategy::Parallel)
            .apply(&volume)?;
        let fixed = filter
            .with_strategy(ExecutionStrategy::Fixed(3))
            .apply(&volume)?;

        assert_eq!(serial, parallel);
        assert_eq!(serial, fixed);
        Ok(())
    }
}

use voxfilt_volume::{Axis, Volume, VolumeSize};

use crate::{
    error::FilterError, kernel::Kernel, parallel::ExecutionStrategy,
    separable::SeparableVolumeFilter,
};

/// A borrowed n-dimensional array as handed over by a numerical host.
///
/// The data is column-major: the first dimension varies fastest.
#[derive(Clone, Copy, Debug)]
pub struct ArrayRef<'a> {
    /// Array dimensions.
    pub shape: &'a [usize],
    /// Array data.
    pub data: &'a [f64],
}

impl<'a> ArrayRef<'a> {
    /// Create a new array reference.
    pub fn new(shape: &'a [usize], data: &'a [f64]) -> Self {
        Self { shape, data }
    }

    fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Inputs that passed validation, ready to be filtered.
#[derive(Clone, Debug)]
pub struct FilterInputs {
    volume: Volume,
    filter: SeparableVolumeFilter,
}

impl FilterInputs {
    /// The validated volume.
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// The filter built from the validated kernels.
    pub fn filter(&self) -> &SeparableVolumeFilter {
        &self.filter
    }

    /// Set the execution strategy of the filter.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.filter = self.filter.with_strategy(strategy);
        self
    }

    /// Run the filter on the volume.
    ///
    /// # Errors
    ///
    /// Only a [`ExecutionStrategy::Fixed`] strategy can fail, when its thread pool cannot be
    /// built.
    pub fn run(&self) -> Result<Volume, FilterError> {
        self.filter.apply_unchecked(&self.volume)
    }
}

/// Validate a host style volume and its kernels.
///
/// Checks, in order: the kernel count, the volume shape, the kernel shapes, the kernel
/// coverage of each axis and the finiteness of the volume samples.
///
/// # Arguments
///
/// * `volume` - A 3D array with dimensions `[rows, cols, slices]`.
/// * `kernels` - Either one kernel for all axes, or the X, Y and Z kernels in that order.
///
/// # Returns
///
/// The typed volume and filter, to be run with [`FilterInputs::run`].
///
/// # Errors
///
/// The first failed check is returned, see [`FilterError`].
pub fn validate_inputs(
    volume: ArrayRef,
    kernels: &[ArrayRef],
) -> Result<FilterInputs, FilterError> {
    if kernels.len() != 1 && kernels.len() != 3 {
        return Err(FilterError::InvalidArgumentCount(kernels.len()));
    }

    let size = volume_size(&volume)?;

    let kernels = kernels
        .iter()
        .map(to_kernel)
        .collect::<Result<Vec<_>, _>>()?;

    let filter = match <[Kernel; 3]>::try_from(kernels) {
        Ok([x, y, z]) => SeparableVolumeFilter::per_axis(x, y, z),
        Err(mut single) => match single.pop() {
            Some(kernel) => SeparableVolumeFilter::new(kernel),
            None => return Err(FilterError::InvalidArgumentCount(0)),
        },
    };

    for axis in Axis::PASS_ORDER {
        let kernel = filter.kernels().for_axis(axis);
        let extent = size.extent(axis);
        if !kernel.covers(extent) {
            return Err(FilterError::KernelTooSmall {
                axis,
                kernel_len: kernel.len(),
                extent,
            });
        }
    }

    if let Some(index) = volume.data.iter().position(|v| !v.is_finite()) {
        log::debug!("volume sample {} is {}", index, volume.data[index]);
        return Err(FilterError::NonFiniteInput(index));
    }

    Ok(FilterInputs {
        volume: Volume::from_size_slice(size, volume.data)?,
        filter,
    })
}

/// Validate the inputs and filter the volume.
///
/// # Examples
///
/// ```
/// use voxfilt_filter::{filter_arrays, ArrayRef};
///
/// let data = vec![1.0; 27];
/// let kernel = [0.25, 0.5, 0.25];
///
/// let out = filter_arrays(
///     ArrayRef::new(&[3, 3, 3], &data),
///     &[ArrayRef::new(&[1, 3], &kernel)],
/// )
/// .unwrap();
/// assert_eq!(out.as_slice(), data.as_slice());
/// ```
pub fn filter_arrays(volume: ArrayRef, kernels: &[ArrayRef]) -> Result<Volume, FilterError> {
    validate_inputs(volume, kernels)?.run()
}

fn volume_size(volume: &ArrayRef) -> Result<VolumeSize, FilterError> {
    let shape = volume.shape;
    if shape.len() != 3 || shape.contains(&0) || volume.numel() != volume.data.len() {
        return Err(FilterError::InvalidVolumeShape(shape.to_vec()));
    }
    Ok(VolumeSize::from([shape[0], shape[1], shape[2]]))
}

fn to_kernel(kernel: &ArrayRef) -> Result<Kernel, FilterError> {
    let len = kernel.numel();
    let longest = kernel.shape.iter().copied().max().unwrap_or(0);
    if len == 0 || len != longest || len != kernel.data.len() {
        return Err(FilterError::InvalidKernelShape(kernel.shape.to_vec()));
    }
    Kernel::from_slice(kernel.data)
        .map_err(|_| FilterError::InvalidKernelShape(kernel.shape.to_vec()))
}

use voxfilt_volume::{Axis, VolumeError, VolumeSize};

/// An error type for the filter module.
///
/// Every variant is raised before any convolution work starts; the convolution passes
/// themselves never fail.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// Neither one nor three kernels were supplied.
    #[error("Required inputs: volume, kernel -or- volume, x-kernel, y-kernel, z-kernel (got {0} kernels)")]
    InvalidArgumentCount(usize),

    /// The volume is not a non-empty 3D array.
    #[error("Input must be a non-empty 3D array, got shape {0:?}")]
    InvalidVolumeShape(Vec<usize>),

    /// A kernel is not a 1D vector with an odd number of entries.
    #[error("Kernels must be 1D vectors with an odd number of entries, got shape {0:?}")]
    InvalidKernelShape(Vec<usize>),

    /// A kernel does not satisfy `2 * len - 1 >= extent` for its axis.
    #[error("Kernel for axis {axis} has {kernel_len} entries, too few for extent {extent} (need 2 * len - 1 >= extent)")]
    KernelTooSmall {
        /// The axis the kernel is applied along.
        axis: Axis,
        /// Number of kernel entries.
        kernel_len: usize,
        /// Extent of the volume along the axis.
        extent: usize,
    },

    /// The volume contains a NaN or infinite sample.
    #[error("Input volume contains a non-finite sample at index {0}")]
    NonFiniteInput(usize),

    /// Source and destination volumes differ in size.
    #[error("Source size {0} does not match destination size {1}")]
    VolumeSizeMismatch(VolumeSize, VolumeSize),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// Error when building a volume.
    #[error(transparent)]
    Volume(#[from] VolumeError),
}

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// single axis convolution pass.
pub mod axis;

/// mirror boundary handling.
pub mod boundary;

/// Error types for the filter module.
pub mod error;

/// symmetric 1D kernel type.
pub mod kernel;

/// kernel builders.
pub mod kernels;

/// module containing parallization utilities.
pub mod parallel;

/// three pass separable volume filter.
pub mod separable;

/// validation of host style input arrays.
pub mod validate;

pub use crate::axis::{convolve_axis, AxisConvolver};
pub use crate::error::FilterError;
pub use crate::kernel::Kernel;
pub use crate::parallel::ExecutionStrategy;
pub use crate::separable::{filter_volume, filter_volume_per_axis, KernelSet, SeparableVolumeFilter};
pub use crate::validate::{filter_arrays, validate_inputs, ArrayRef, FilterInputs};

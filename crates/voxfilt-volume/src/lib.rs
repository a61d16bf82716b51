#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the volume module.
pub mod error;

/// dense volume representation.
pub mod volume;

pub use crate::error::VolumeError;
pub use crate::volume::{Axis, Volume, VolumeSize};

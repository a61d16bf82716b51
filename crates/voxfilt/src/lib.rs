#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use voxfilt_volume as volume;

#[doc(inline)]
pub use voxfilt_filter as filter;

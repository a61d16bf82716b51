/// An error type for the volume module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum VolumeError {
    /// Error when the data length does not match the volume size.
    #[error("Data length ({0}) does not match the volume size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a voxel coordinate falls outside the volume.
    #[error("Voxel ({0}, {1}, {2}) is out of bounds for volume {3}")]
    IndexOutOfBounds(usize, usize, usize, String),
}

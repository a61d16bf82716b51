use crate::error::VolumeError;

/// Volume size in voxels
///
/// The dimensions follow the column-major convention of numerical hosts: `rows` (Y) varies
/// fastest in memory, then `cols` (X), then `slices` (Z).
///
/// # Examples
///
/// ```
/// use voxfilt_volume::VolumeSize;
///
/// let size = VolumeSize {
///     rows: 4,
///     cols: 5,
///     slices: 6,
/// };
///
/// assert_eq!(size.numel(), 120);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VolumeSize {
    /// Number of rows (extent along Y)
    pub rows: usize,
    /// Number of columns (extent along X)
    pub cols: usize,
    /// Number of slices (extent along Z)
    pub slices: usize,
}

impl VolumeSize {
    /// Total number of voxels.
    pub fn numel(&self) -> usize {
        self.rows * self.cols * self.slices
    }

    /// Number of voxels in one Z slice.
    pub fn slab_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Extent of the volume along the given axis.
    pub fn extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::Y => self.rows,
            Axis::X => self.cols,
            Axis::Z => self.slices,
        }
    }

    /// Distance in the flat buffer between two neighbouring voxels along the given axis.
    pub fn stride(&self, axis: Axis) -> usize {
        match axis {
            Axis::Y => 1,
            Axis::X => self.rows,
            Axis::Z => self.rows * self.cols,
        }
    }

    /// Flat buffer offset of the voxel at `(y, x, z)`.
    #[inline]
    pub fn offset(&self, y: usize, x: usize, z: usize) -> usize {
        y + self.rows * (x + self.cols * z)
    }
}

impl std::fmt::Display for VolumeSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "VolumeSize {{ rows: {}, cols: {}, slices: {} }}",
            self.rows, self.cols, self.slices
        )
    }
}

impl From<[usize; 3]> for VolumeSize {
    /// Build a size from `[rows, cols, slices]`, i.e. the host array dimensions in order.
    fn from(dims: [usize; 3]) -> Self {
        VolumeSize {
            rows: dims[0],
            cols: dims[1],
            slices: dims[2],
        }
    }
}

impl From<VolumeSize> for [usize; 3] {
    fn from(size: VolumeSize) -> Self {
        [size.rows, size.cols, size.slices]
    }
}

/// A spatial axis of a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The row axis, fastest varying in memory.
    Y,
    /// The column axis.
    X,
    /// The slice axis, slowest varying in memory.
    Z,
}

impl Axis {
    /// The order in which a separable filter visits the axes.
    pub const PASS_ORDER: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Axis::Y => "y",
            Axis::X => "x",
            Axis::Z => "z",
        };
        write!(f, "{name}")
    }
}

/// A dense volume of `f64` samples.
///
/// The samples are stored contiguously with Y varying fastest, see [`VolumeSize::offset`].
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    size: VolumeSize,
    data: Vec<f64>,
}

impl Volume {
    /// Create a new volume from voxel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the volume in voxels.
    /// * `data` - The voxel data, Y fastest.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the volume size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxfilt_volume::{Volume, VolumeSize};
    ///
    /// let volume = Volume::new([2, 3, 4].into(), vec![0.0; 24]).unwrap();
    ///
    /// assert_eq!(volume.rows(), 2);
    /// assert_eq!(volume.cols(), 3);
    /// assert_eq!(volume.slices(), 4);
    /// ```
    pub fn new(size: VolumeSize, data: Vec<f64>) -> Result<Self, VolumeError> {
        if data.len() != size.numel() {
            return Err(VolumeError::InvalidDataLength(data.len(), size.numel()));
        }
        Ok(Self { size, data })
    }

    /// Create a new volume with every voxel set to `val`.
    pub fn from_size_val(size: VolumeSize, val: f64) -> Self {
        Self {
            size,
            data: vec![val; size.numel()],
        }
    }

    /// Create a new volume by copying a slice of voxel data.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the volume size, an error is returned.
    pub fn from_size_slice(size: VolumeSize, data: &[f64]) -> Result<Self, VolumeError> {
        Self::new(size, data.to_vec())
    }

    /// Create a new volume by evaluating `f(y, x, z)` at every voxel.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxfilt_volume::Volume;
    ///
    /// let volume = Volume::from_size_fn([2, 2, 2].into(), |y, x, z| (y + 2 * x + 4 * z) as f64);
    /// assert_eq!(volume.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    /// ```
    pub fn from_size_fn(size: VolumeSize, f: impl Fn(usize, usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(size.numel());
        for z in 0..size.slices {
            for x in 0..size.cols {
                for y in 0..size.rows {
                    data.push(f(y, x, z));
                }
            }
        }
        Self { size, data }
    }

    /// Get the size of the volume in voxels.
    pub fn size(&self) -> VolumeSize {
        self.size
    }

    /// Number of rows (extent along Y).
    pub fn rows(&self) -> usize {
        self.size.rows
    }

    /// Number of columns (extent along X).
    pub fn cols(&self) -> usize {
        self.size.cols
    }

    /// Number of slices (extent along Z).
    pub fn slices(&self) -> usize {
        self.size.slices
    }

    /// Total number of voxels.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the voxel data as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get the voxel data as a mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Get a reference to the voxel at `(y, x, z)`, or `None` if out of bounds.
    pub fn get(&self, y: usize, x: usize, z: usize) -> Option<&f64> {
        if y >= self.size.rows || x >= self.size.cols || z >= self.size.slices {
            return None;
        }
        self.data.get(self.size.offset(y, x, z))
    }

    /// Set the voxel at `(y, x, z)`.
    ///
    /// # Errors
    ///
    /// If the coordinate is out of bounds, an error is returned.
    pub fn set(&mut self, y: usize, x: usize, z: usize, val: f64) -> Result<(), VolumeError> {
        if y >= self.size.rows || x >= self.size.cols || z >= self.size.slices {
            return Err(VolumeError::IndexOutOfBounds(
                y,
                x,
                z,
                self.size.to_string(),
            ));
        }
        let offset = self.size.offset(y, x, z);
        self.data[offset] = val;
        Ok(())
    }
}

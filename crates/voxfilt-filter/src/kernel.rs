use crate::error::FilterError;

/// A 1D convolution kernel with an odd number of taps.
///
/// The kernel is expected to be symmetric about its center tap. The filters trust that
/// expectation and only read the center and the right half of the taps; use
/// [`Kernel::is_symmetric`] to check a kernel of unknown origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    taps: Vec<f64>,
}

impl Kernel {
    /// Create a new kernel from its taps.
    ///
    /// # Arguments
    ///
    /// * `taps` - The kernel values, `2r + 1` of them.
    ///
    /// # Errors
    ///
    /// If the taps are empty or of even length, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxfilt_filter::Kernel;
    ///
    /// let kernel = Kernel::new(vec![0.25, 0.5, 0.25]).unwrap();
    /// assert_eq!(kernel.radius(), 1);
    /// assert_eq!(kernel.center(), 0.5);
    ///
    /// assert!(Kernel::new(vec![0.5, 0.5]).is_err());
    /// ```
    pub fn new(taps: Vec<f64>) -> Result<Self, FilterError> {
        if taps.len() % 2 == 0 {
            return Err(FilterError::InvalidKernelShape(vec![taps.len()]));
        }
        Ok(Self { taps })
    }

    /// Create a new kernel by copying a slice of taps.
    pub fn from_slice(taps: &[f64]) -> Result<Self, FilterError> {
        Self::new(taps.to_vec())
    }

    /// Wrap taps already known to be of odd length.
    pub(crate) fn from_odd_taps(taps: Vec<f64>) -> Self {
        debug_assert!(taps.len() % 2 == 1);
        Self { taps }
    }

    /// The unit impulse `[1]`.
    pub fn identity() -> Self {
        Self { taps: vec![1.0] }
    }

    /// Number of taps.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Always false, a kernel has at least one tap.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Kernel radius `r = (len - 1) / 2`.
    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }

    /// The center tap.
    pub fn center(&self) -> f64 {
        self.taps[self.radius()]
    }

    /// The center tap followed by the right half, i.e. `taps[r..]`.
    pub fn half(&self) -> &[f64] {
        &self.taps[self.radius()..]
    }

    /// All taps.
    pub fn as_slice(&self) -> &[f64] {
        &self.taps
    }

    /// Sum of all taps.
    pub fn sum(&self) -> f64 {
        self.taps.iter().sum()
    }

    /// Whether the kernel is long enough for a volume of the given extent along its axis.
    ///
    /// The mirror boundary requires `2 * len - 1 >= extent`.
    pub fn covers(&self, extent: usize) -> bool {
        2 * self.taps.len() - 1 >= extent
    }

    /// Check that `taps[r - k]` and `taps[r + k]` agree within `tol` for every `k`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.taps
            .iter()
            .zip(self.taps.iter().rev())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

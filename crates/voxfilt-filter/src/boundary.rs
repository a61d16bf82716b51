/// Fold an index into `[0, extent)` by mirroring across the edge samples.
///
/// The edge sample itself is not repeated: `-1` maps to `1` and `extent` maps to
/// `extent - 2`. Every index maps onto the single sample of a one-sample extent.
///
/// # Arguments
///
/// * `i` - The possibly out of range index.
/// * `extent` - The number of samples along the axis, must be > 0.
///
/// # Examples
///
/// ```
/// use voxfilt_filter::boundary::mirror_index;
///
/// // ...c b | a b c d | c b...
/// assert_eq!(mirror_index(-2, 4), 2);
/// assert_eq!(mirror_index(-1, 4), 1);
/// assert_eq!(mirror_index(4, 4), 2);
/// assert_eq!(mirror_index(5, 4), 1);
/// ```
#[inline]
pub fn mirror_index(i: isize, extent: usize) -> usize {
    if extent <= 1 {
        return 0;
    }
    let period = 2 * extent as isize - 2;
    let j = i.rem_euclid(period);
    if j >= extent as isize {
        (period - j) as usize
    } else {
        j as usize
    }
}

/// Precomputed mirror taps for one axis.
///
/// For every position `i` along the axis and every kernel offset `k` in `1..=r`, stores the
/// folded positions of `i - k` and `i + k`. Near an edge the backward sample folds onto a
/// forward one, so the pair can share a single multiply with the kernel weight.
///
/// The mirrored positions repeat with period `2 * extent - 2` in `k`, so the table never holds
/// more than that many offsets per position; [`BoundaryTable::fold_weights`] sums the kernel
/// weights of offsets that land on the same pair.
#[derive(Clone, Debug)]
pub struct BoundaryTable {
    columns: usize,
    pairs: Vec<(usize, usize)>,
}

impl BoundaryTable {
    /// Build the table for a kernel of radius `radius` on an axis of `extent` samples.
    pub fn new(extent: usize, radius: usize) -> Self {
        let columns = radius.min(Self::period(extent));
        let mut pairs = Vec::with_capacity(extent * columns);
        for i in 0..extent as isize {
            for k in 1..=columns as isize {
                pairs.push((mirror_index(i - k, extent), mirror_index(i + k, extent)));
            }
        }
        Self { columns, pairs }
    }

    /// Period of the mirrored positions along an axis of `extent` samples.
    pub fn period(extent: usize) -> usize {
        (2 * extent).saturating_sub(2).max(1)
    }

    /// Number of offsets stored per position.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Fold the weights of offsets `1..=r` onto the stored columns.
    ///
    /// Offset `k` lands on column `(k - 1) % columns`. When `r` does not exceed the period the
    /// weights are returned unchanged.
    pub fn fold_weights(&self, weights: &[f64]) -> Vec<f64> {
        if weights.len() <= self.columns {
            return weights.to_vec();
        }
        let mut folded = vec![0.0; self.columns];
        for (k, &w) in weights.iter().enumerate() {
            folded[k % self.columns] += w;
        }
        folded
    }

    /// The `(backward, forward)` positions for the stored offsets around position `i`.
    #[inline]
    pub fn taps(&self, i: usize) -> &[(usize, usize)] {
        &self.pairs[i * self.columns..(i + 1) * self.columns]
    }
}

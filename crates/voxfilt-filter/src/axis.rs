use rayon::prelude::*;
use voxfilt_volume::{Axis, Volume, VolumeSize};

use crate::{boundary::BoundaryTable, error::FilterError, kernel::Kernel, parallel::ExecutionStrategy};

/// Convolves a volume with a symmetric 1D kernel along one axis.
///
/// The same routine serves all three axes: the axis only selects the stride between
/// neighbouring taps and the extent the mirror boundary folds into. Each output voxel costs
/// `r + 1` multiplications, the two taps at `±k` being summed before they are weighted.
///
/// Kernels longer than the mirror period of the axis have their weights folded onto the
/// period, so the cost per voxel is bounded by `2 * extent - 1` multiplications.
pub struct AxisConvolver {
    axis: Axis,
    size: VolumeSize,
    stride: usize,
    center: f64,
    weights: Vec<f64>,
    table: BoundaryTable,
}

impl AxisConvolver {
    /// Create a convolver for `kernel` along `axis` of a volume of the given size.
    pub fn new(kernel: &Kernel, axis: Axis, size: VolumeSize) -> Self {
        let table = BoundaryTable::new(size.extent(axis), kernel.radius());
        let weights = table.fold_weights(&kernel.half()[1..]);
        Self {
            axis,
            size,
            stride: size.stride(axis),
            center: kernel.center(),
            weights,
            table,
        }
    }

    /// The axis this convolver walks.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Run a full pass from `src` into `dst`, overwriting every element of `dst`.
    ///
    /// PRECONDITION: both slices hold exactly `size.numel()` voxels.
    pub(crate) fn run(&self, src: &[f64], dst: &mut [f64], strategy: ExecutionStrategy) {
        let slab_len = self.size.slab_len();
        if slab_len == 0 {
            return;
        }

        if strategy.is_parallel(self.size.numel()) {
            dst.par_chunks_mut(slab_len)
                .enumerate()
                .for_each(|(z, slab)| self.convolve_slab(src, z, slab));
        } else {
            dst.chunks_mut(slab_len)
                .enumerate()
                .for_each(|(z, slab)| self.convolve_slab(src, z, slab));
        }
    }

    /// Compute the output slice `z`.
    fn convolve_slab(&self, src: &[f64], z: usize, slab: &mut [f64]) {
        let rows = self.size.rows;
        let slab_offset = z * self.size.slab_len();

        for (x, column) in slab.chunks_exact_mut(rows).enumerate() {
            for (y, out) in column.iter_mut().enumerate() {
                let pos = match self.axis {
                    Axis::Y => y,
                    Axis::X => x,
                    Axis::Z => z,
                };
                let idx = slab_offset + x * rows + y;
                let line = idx - pos * self.stride;

                let mut acc = self.center * src[idx];
                for (&w, &(back, fwd)) in self.weights.iter().zip(self.table.taps(pos)) {
                    acc += w * (src[line + back * self.stride] + src[line + fwd * self.stride]);
                }
                *out = acc;
            }
        }
    }
}

/// Convolve a volume along one axis.
///
/// # Arguments
///
/// * `src` - The source volume.
/// * `dst` - The destination volume, fully overwritten.
/// * `kernel` - A symmetric kernel with `2 * len - 1 >= extent` along `axis`.
/// * `axis` - The axis to convolve along.
/// * `strategy` - Execution strategy: `Auto`, `Serial`, `Parallel` or `Fixed`.
///
/// # Errors
///
/// If the volume sizes differ or the kernel is too short for the axis, an error is returned.
///
/// # Examples
///
/// ```
/// use voxfilt_filter::{convolve_axis, ExecutionStrategy, Kernel};
/// use voxfilt_volume::{Axis, Volume};
///
/// let src = Volume::from_size_fn([3, 1, 1].into(), |y, _, _| y as f64);
/// let mut dst = Volume::from_size_val(src.size(), 0.0);
/// let kernel = Kernel::new(vec![0.25, 0.5, 0.25]).unwrap();
///
/// convolve_axis(&src, &mut dst, &kernel, Axis::Y, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(dst.as_slice(), &[0.5, 1.0, 1.5]);
/// ```
pub fn convolve_axis(
    src: &Volume,
    dst: &mut Volume,
    kernel: &Kernel,
    axis: Axis,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    if src.size() != dst.size() {
        return Err(FilterError::VolumeSizeMismatch(src.size(), dst.size()));
    }

    let extent = src.size().extent(axis);
    if !kernel.covers(extent) {
        return Err(FilterError::KernelTooSmall {
            axis,
            kernel_len: kernel.len(),
            extent,
        });
    }

    let convolver = AxisConvolver::new(kernel, axis, src.size());
    strategy.install(|| convolver.run(src.as_slice(), dst.as_slice_mut(), strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Volume {
        Volume::from_size_fn([3, 4, 5].into(), |y, x, z| {
            (y as f64) + 10.0 * (x as f64) + 100.0 * (z as f64)
        })
    }

    #[test]
    fn test_convolve_axis_identity() -> Result<(), FilterError> {
        let src = ramp();
        let kernel = Kernel::identity();
        for axis in Axis::PASS_ORDER {
            let mut dst = Volume::from_size_val(src.size(), -1.0);
            AxisConvolver::new(&kernel, axis, src.size()).run(
                src.as_slice(),
                dst.as_slice_mut(),
                ExecutionStrategy::Serial,
            );
            assert_eq!(dst, src);
        }

        // the public entry point only accepts [1] on one-sample extents
        let single = Volume::from_size_val([1, 1, 1].into(), 3.0);
        let mut dst = Volume::from_size_val(single.size(), 0.0);
        convolve_axis(&single, &mut dst, &kernel, Axis::X, ExecutionStrategy::Serial)?;
        assert_eq!(dst, single);
        Ok(())
    }

    #[test]
    fn test_convolve_axis_mirror_edges() -> Result<(), FilterError> {
        let src = Volume::from_size_slice([1, 1, 3].into(), &[1.0, 2.0, 4.0])?;
        let mut dst = Volume::from_size_val(src.size(), 0.0);
        let kernel = Kernel::new(vec![1.0, 2.0, 1.0])?;

        convolve_axis(&src, &mut dst, &kernel, Axis::Z, ExecutionStrategy::Serial)?;

        // z = 0 sees [2, 1, 2], z = 2 sees [2, 4, 2]
        assert_eq!(dst.as_slice(), &[6.0, 9.0, 12.0]);
        Ok(())
    }

    #[test]
    fn test_convolve_axis_only_walks_its_axis() -> Result<(), FilterError> {
        let src = ramp();
        let kernel = Kernel::new(vec![0.25, 0.5, 0.25])?;

        let mut along_y = Volume::from_size_val(src.size(), 0.0);
        convolve_axis(&src, &mut along_y, &kernel, Axis::Y, ExecutionStrategy::Serial)?;

        // linear in y in the interior, mirrored at the edges
        for z in 0..src.slices() {
            for x in 0..src.cols() {
                let base = 10.0 * x as f64 + 100.0 * z as f64;
                assert_eq!(along_y.get(0, x, z), Some(&(base + 0.5)));
                assert_eq!(along_y.get(1, x, z), Some(&(base + 1.0)));
                assert_eq!(along_y.get(2, x, z), Some(&(base + 1.5)));
            }
        }
        Ok(())
    }

    #[test]
    fn test_convolve_axis_size_mismatch() -> Result<(), FilterError> {
        let src = ramp();
        let mut dst = Volume::from_size_val([3, 4, 4].into(), 0.0);
        let kernel = Kernel::new(vec![1.0, 1.0, 1.0])?;
        let res = convolve_axis(&src, &mut dst, &kernel, Axis::X, ExecutionStrategy::Serial);
        assert!(matches!(res, Err(FilterError::VolumeSizeMismatch(_, _))));
        Ok(())
    }

    #[test]
    fn test_convolve_axis_kernel_too_small() -> Result<(), FilterError> {
        let src = Volume::from_size_val([3, 4, 6].into(), 1.0);
        let mut dst = Volume::from_size_val(src.size(), 0.0);
        let kernel = Kernel::new(vec![1.0, 1.0, 1.0])?;
        let res = convolve_axis(&src, &mut dst, &kernel, Axis::Z, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(FilterError::KernelTooSmall {
                axis: Axis::Z,
                kernel_len: 3,
                extent: 6,
            })
        );
        Ok(())
    }

    #[test]
    fn test_convolve_axis_kernel_exactly_covers() -> Result<(), FilterError> {
        // 2 * 3 - 1 == 5 slices
        let src = ramp();
        let mut dst = Volume::from_size_val(src.size(), 0.0);
        let kernel = Kernel::new(vec![0.25, 0.5, 0.25])?;
        convolve_axis(&src, &mut dst, &kernel, Axis::Z, ExecutionStrategy::Serial)?;

        // linear in z in the interior
        assert_eq!(dst.get(1, 2, 2), src.get(1, 2, 2));
        // mirrored at z = 0: 0.5 * v0 + 0.5 * v1
        assert_eq!(dst.get(0, 0, 0), Some(&50.0));
        Ok(())
    }

    #[test]
    fn test_convolve_axis_kernel_longer_than_period() -> Result<(), FilterError> {
        // 15 taps on 3 samples wrap the mirror several times
        let src = Volume::from_size_slice([3, 1, 1].into(), &[1.0, -2.0, 5.0])?;
        let taps = (0..15)
            .map(|t| 1.0 / (1.0 + (t as f64 - 7.0).abs()))
            .collect::<Vec<_>>();
        let kernel = Kernel::new(taps.clone())?;

        let convolver = AxisConvolver::new(&kernel, Axis::Y, src.size());
        assert_eq!(convolver.table.columns(), 4);

        let mut dst = Volume::from_size_val(src.size(), 0.0);
        convolve_axis(&src, &mut dst, &kernel, Axis::Y, ExecutionStrategy::Serial)?;

        for y in 0..3 {
            let expected = taps
                .iter()
                .enumerate()
                .map(|(t, w)| {
                    let i = crate::boundary::mirror_index(y as isize + t as isize - 7, 3);
                    w * src.as_slice()[i]
                })
                .sum::<f64>();
            assert_relative_eq!(dst.as_slice()[y], expected, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_convolve_axis_serial_parallel_identical() -> Result<(), FilterError> {
        let src = Volume::from_size_fn([7, 6, 5].into(), |y, x, z| {
            ((y * 31 + x * 17 + z * 7) % 13) as f64 / 13.0
        });
        let kernel = Kernel::new(vec![0.1, 0.2, 0.4, 0.2, 0.1])?;

        for axis in Axis::PASS_ORDER {
            let mut serial = Volume::from_size_val(src.size(), 0.0);
            let mut parallel = Volume::from_size_val(src.size(), 0.0);
            convolve_axis(&src, &mut serial, &kernel, axis, ExecutionStrategy::Serial)?;
            convolve_axis(&src, &mut parallel, &kernel, axis, ExecutionStrategy::Parallel)?;
            assert_eq!(serial, parallel);
        }
        Ok(())
    }
}

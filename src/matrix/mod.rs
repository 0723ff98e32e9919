//! Pairwise distance matrices between two descriptor collections.
//!
//! For collections of N1 and N2 descriptors the result has N2 rows and N1
//! columns: entry `(j, i)` is the distance from descriptor `i` of the first
//! collection to descriptor `j` of the second. Storage is row-major, so row
//! `j` is one contiguous slice of N1 values.

use crate::descriptor::DescriptorSet;
use crate::kernel::{DistancePlan, Kernel};
use crate::layout::Variant;
use crate::trace::{trace_event, trace_span};
use crate::util::{AlphaGammaError, AlphaGammaResult};

#[cfg(feature = "rayon")]
pub mod rayon;

/// Dense N2×N1 matrix of distances.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows (descriptors of the second collection).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (descriptors of the first collection).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns entry `(j, i)` if it is within bounds.
    pub fn get(&self, j: usize, i: usize) -> Option<f64> {
        if j >= self.rows || i >= self.cols {
            return None;
        }
        self.data.get(j * self.cols + i).copied()
    }

    /// Returns row `j`.
    pub fn row(&self, j: usize) -> Option<&[f64]> {
        if j >= self.rows {
            return None;
        }
        let start = j * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Row-major backing slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Returns the N1×N2 transpose.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for j in 0..self.rows {
            for i in 0..self.cols {
                out.data[i * self.rows + j] = self.data[j * self.cols + i];
            }
        }
        out
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Fills one output row: distances from `desc2` to every descriptor of `set1`.
#[inline]
pub(crate) fn fill_row<K: Kernel>(
    plan: &DistancePlan,
    set1: DescriptorSet<'_>,
    desc2: &[u8],
    row: &mut [f64],
) {
    for (out, desc1) in row.iter_mut().zip(set1.iter()) {
        *out = K::distance(plan, desc1, desc2);
    }
}

/// Checks that `plan` was built for kernel `K` and that both collections
/// have the row length it expects.
pub(crate) fn check_operands<K: Kernel>(
    set1: DescriptorSet<'_>,
    set2: DescriptorSet<'_>,
    plan: &DistancePlan,
) -> AlphaGammaResult<()> {
    if plan.encoding() != K::ENCODING {
        return Err(AlphaGammaError::InvalidInput(
            "distance plan encoding does not match the kernel",
        ));
    }
    if set1.rows() != set2.rows() {
        return Err(AlphaGammaError::DescriptorLengthMismatch {
            left: set1.rows(),
            right: set2.rows(),
        });
    }
    if set1.rows() != plan.row_len() {
        let layout = plan.layout();
        return Err(AlphaGammaError::DescriptorSizeMismatch {
            got: set1.rows(),
            base: layout.row_len(plan.encoding(), Variant::Base),
            extended: layout.row_len(plan.encoding(), Variant::Extended),
        });
    }
    Ok(())
}

/// Computes all pairwise distances sequentially.
///
/// Fails before computing anything when the plan does not fit `K` or the
/// collections do not match the plan's row length.
pub fn compute_distances<K: Kernel>(
    set1: DescriptorSet<'_>,
    set2: DescriptorSet<'_>,
    plan: &DistancePlan,
) -> AlphaGammaResult<DistanceMatrix> {
    check_operands::<K>(set1, set2, plan)?;
    let _span = trace_span!("compute_distances", n1 = set1.cols(), n2 = set2.cols()).entered();

    let mut matrix = DistanceMatrix::zeros(set2.cols(), set1.cols());
    let cols = set1.cols();
    if cols > 0 {
        for (row, desc2) in matrix.data_mut().chunks_exact_mut(cols).zip(set2.iter()) {
            fill_row::<K>(plan, set1, desc2, row);
        }
    }

    trace_event!("distances_computed", cells = set1.cols() * set2.cols());
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::DistanceMatrix;

    #[test]
    fn transpose_swaps_indices() {
        let mut m = DistanceMatrix::zeros(2, 3);
        for (k, v) in m.data_mut().iter_mut().enumerate() {
            *v = k as f64;
        }
        let t = m.transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        for j in 0..2 {
            for i in 0..3 {
                assert_eq!(m.get(j, i), t.get(i, j));
            }
        }
        assert_eq!(m.row(1).unwrap(), &[3.0, 4.0, 5.0]);
        assert!(m.get(2, 0).is_none());
    }
}

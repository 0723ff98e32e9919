//! Rayon-parallel matrix driver (feature-gated).
//!
//! Parallelizes over output rows: each task owns one row (one descriptor of
//! the second collection) and writes it exactly once, so no synchronization
//! beyond rayon's join is needed.

use crate::descriptor::DescriptorSet;
use crate::kernel::{DistancePlan, Kernel};
use crate::matrix::{check_operands, fill_row, DistanceMatrix};
use crate::trace::{trace_event, trace_span};
use crate::util::AlphaGammaResult;
use rayon::prelude::*;

/// Row-parallel version of [`compute_distances`](crate::matrix::compute_distances).
pub fn compute_distances_par<K>(
    set1: DescriptorSet<'_>,
    set2: DescriptorSet<'_>,
    plan: &DistancePlan,
) -> AlphaGammaResult<DistanceMatrix>
where
    K: Kernel,
{
    check_operands::<K>(set1, set2, plan)?;
    let _span = trace_span!(
        "compute_distances",
        n1 = set1.cols(),
        n2 = set2.cols(),
        parallel = true
    )
    .entered();

    let mut matrix = DistanceMatrix::zeros(set2.cols(), set1.cols());
    let cols = set1.cols();
    if cols > 0 {
        matrix
            .data_mut()
            .par_chunks_mut(cols)
            .zip(set2.as_slice().par_chunks(set2.rows()))
            .for_each(|(row, desc2)| fill_row::<K>(plan, set1, desc2, row));
    }

    trace_event!("distances_computed", cells = set1.cols() * set2.cols());
    Ok(matrix)
}

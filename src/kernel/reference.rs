//! Byte-wise reference kernel over unpacked descriptors.
//!
//! Each element is one byte; two elements disagree when their byte values
//! differ. Extended rows carry the confidence block `descriptor_size`
//! elements after the base block, and every position contributes
//!
//! ```text
//! (B1 != B2) + (E1 != E2) + 2 * (E1 && E2) * (B1 != B2)
//! ```
//!
//! so a disagreement between two confident elements costs three.

use crate::kernel::{DistancePlan, FieldTerm, FieldWeighting, Kernel};
use crate::layout::{Encoding, Variant};

/// Reference kernel for one-byte-per-element descriptors.
pub struct ReferenceKernel;

/// Extended contribution of a single position.
#[inline]
pub(crate) fn extended_contribution(b1: u8, b2: u8, e1: u8, e2: u8) -> u64 {
    let base = u64::from(b1 != b2);
    let confident = u64::from(e1 != 0 && e2 != 0);
    base + u64::from(e1 != e2) + 2 * confident * base
}

impl Kernel for ReferenceKernel {
    const ENCODING: Encoding = Encoding::Unpacked;
    const WEIGHTING: FieldWeighting = FieldWeighting::Separate;

    fn field_distance(plan: &DistancePlan, desc1: &[u8], desc2: &[u8], term: &FieldTerm) -> u64 {
        let range = term.range().as_range();
        let base1 = &desc1[range.clone()];
        let base2 = &desc2[range.clone()];
        match plan.variant() {
            Variant::Base => base1
                .iter()
                .zip(base2)
                .filter(|(a, b)| a != b)
                .count() as u64,
            Variant::Extended => {
                let offset = plan.extended_offset();
                let ext = range.start + offset..range.end + offset;
                let ext1 = &desc1[ext.clone()];
                let ext2 = &desc2[ext];
                base1
                    .iter()
                    .zip(base2)
                    .zip(ext1.iter().zip(ext2))
                    .map(|((&b1, &b2), (&e1, &e2))| extended_contribution(b1, b2, e1, e2))
                    .sum()
            }
        }
    }
}

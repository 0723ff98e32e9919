//! Low-level building blocks for custom distance pipelines.
//!
//! These items expose the bit-span decomposition, the checked Hamming
//! primitives, the kernels, and the matrix drivers behind
//! [`DistanceEngine`](crate::DistanceEngine). Most users should prefer the
//! engine or the `alpha_gamma_distances*` functions.

pub use crate::bits::{BitSpan, Chunk, MaskedByte};
pub use crate::kernel::packed::{extended_hamming_distance, hamming_distance, PackedKernel};
pub use crate::kernel::reference::ReferenceKernel;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::PackedSimdKernel;
pub use crate::kernel::{DistancePlan, FieldTerm, Kernel};
pub use crate::matrix::compute_distances;
#[cfg(feature = "rayon")]
pub use crate::matrix::rayon::compute_distances_par;

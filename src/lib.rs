//! AlphaGamma is a distance engine for radial binary image descriptors.
//!
//! A descriptor sampled on concentric circles and angular rays is split into
//! alpha, beta and gamma fields. This crate packs byte-per-element
//! descriptors into LSB-first bitstrings and computes weighted pairwise
//! distance matrices with either a byte-wise reference kernel or a packed
//! popcount kernel, with optional row parallelism via the `rayon` feature and
//! SIMD word processing via the `simd` feature.

pub mod bits;
pub mod descriptor;
pub mod engine;
pub mod kernel;
pub mod layout;
pub mod lowlevel;
pub mod matrix;
mod trace;
pub mod util;

pub use bits::{
    pack_bits, pack_descriptor, pack_descriptor_set, unpack_bits, Orientation, PackedBits,
};
pub use descriptor::{DescriptorSet, OwnedDescriptorSet};
pub use engine::{
    alpha_gamma_distances, alpha_gamma_distances_fast, DistanceConfig, DistanceEngine,
};
pub use kernel::{FieldWeighting, Weights};
pub use layout::{
    descriptor_size, packed_byte_size, DescriptorLayout, Encoding, Field, FieldRange, Variant,
};
pub use matrix::DistanceMatrix;
pub use util::{AlphaGammaError, AlphaGammaResult};

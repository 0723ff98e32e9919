//! Descriptor distance kernels.
//!
//! A kernel computes the weighted field-wise distance between two descriptor
//! rows under a [`DistancePlan`]. The plan fixes the layout, the variant
//! (base or extended), and the list of weighted fields, so kernels only count
//! disagreements over precomputed ranges.

use crate::bits::BitSpan;
use crate::layout::{DescriptorLayout, Encoding, Field, FieldRange, Variant};
use crate::util::{AlphaGammaError, AlphaGammaResult};

/// Per-field weights `(A, B, G)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    /// Weight of the alpha field.
    pub alpha: f64,
    /// Weight of the beta field; inert under [`FieldWeighting::Merged`].
    pub beta: f64,
    /// Weight of the gamma (or combined beta+gamma) field.
    pub gamma: f64,
}

impl Weights {
    pub const fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Weights of the legacy unweighted reference entry point.
    pub const fn legacy() -> Self {
        Self::new(5.0, 0.5, 1.0)
    }

    /// Checks that every weight is finite and non-negative.
    pub fn validate(&self) -> AlphaGammaResult<()> {
        for w in [self.alpha, self.beta, self.gamma] {
            if !w.is_finite() {
                return Err(AlphaGammaError::InvalidWeights {
                    reason: "weights must be finite",
                });
            }
            if w < 0.0 {
                return Err(AlphaGammaError::InvalidWeights {
                    reason: "weights must be non-negative",
                });
            }
        }
        Ok(())
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(5.0, 1.0, 1.0)
    }
}

/// How beta and gamma contribute to the distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldWeighting {
    /// Alpha, beta and gamma weighted by A, B and G.
    Separate,
    /// Alpha weighted by A, beta and gamma together by G; B is ignored.
    Merged,
}

/// One weighted field of a plan.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldTerm {
    range: FieldRange,
    span: BitSpan,
    weight: f64,
}

impl FieldTerm {
    fn new(range: FieldRange, weight: f64) -> Self {
        Self {
            range,
            span: BitSpan::new(range.start, range.len),
            weight,
        }
    }

    /// Element range of the field (identical to its bit range when packed).
    pub fn range(&self) -> FieldRange {
        self.range
    }

    /// Chunk layout of the field over a packed row.
    pub fn span(&self) -> &BitSpan {
        &self.span
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Precomputed parameters shared by every pair of a distance matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct DistancePlan {
    layout: DescriptorLayout,
    encoding: Encoding,
    variant: Variant,
    weighting: FieldWeighting,
    terms: Vec<FieldTerm>,
}

impl DistancePlan {
    /// Builds a plan; fails on invalid weights.
    pub fn new(
        layout: DescriptorLayout,
        encoding: Encoding,
        variant: Variant,
        weights: Weights,
        weighting: FieldWeighting,
    ) -> AlphaGammaResult<Self> {
        weights.validate()?;
        let terms = match weighting {
            FieldWeighting::Separate => vec![
                FieldTerm::new(layout.field(Field::Alpha), weights.alpha),
                FieldTerm::new(layout.field(Field::Beta), weights.beta),
                FieldTerm::new(layout.field(Field::Gamma), weights.gamma),
            ],
            FieldWeighting::Merged => vec![
                FieldTerm::new(layout.field(Field::Alpha), weights.alpha),
                FieldTerm::new(layout.beta_gamma(), weights.gamma),
            ],
        };
        Ok(Self {
            layout,
            encoding,
            variant,
            weighting,
            terms,
        })
    }

    /// Builds a plan for kernel `K`, using its native weighting unless one is given.
    pub fn for_kernel<K: Kernel>(
        layout: DescriptorLayout,
        variant: Variant,
        weights: Weights,
        weighting: Option<FieldWeighting>,
    ) -> AlphaGammaResult<Self> {
        Self::new(
            layout,
            K::ENCODING,
            variant,
            weights,
            weighting.unwrap_or(K::WEIGHTING),
        )
    }

    pub fn layout(&self) -> &DescriptorLayout {
        &self.layout
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn weighting(&self) -> FieldWeighting {
        self.weighting
    }

    pub fn terms(&self) -> &[FieldTerm] {
        &self.terms
    }

    /// Row length every descriptor must have under this plan.
    pub fn row_len(&self) -> usize {
        self.layout.row_len(self.encoding, self.variant)
    }

    /// Offset of the confidence block in storage units.
    pub fn extended_offset(&self) -> usize {
        self.layout.extended_offset(self.encoding)
    }
}

/// Kernel trait for pairwise descriptor distances.
///
/// Rows passed to a kernel must be exactly [`DistancePlan::row_len`] bytes
/// long; the matrix driver and the engine check this before any call.
pub trait Kernel {
    /// Row encoding the kernel consumes.
    const ENCODING: Encoding;
    /// Field weighting used when the caller does not choose one.
    const WEIGHTING: FieldWeighting;

    /// Counts the (extended) disagreements over one field.
    fn field_distance(plan: &DistancePlan, desc1: &[u8], desc2: &[u8], term: &FieldTerm) -> u64;

    /// Weighted distance over all fields of the plan.
    fn distance(plan: &DistancePlan, desc1: &[u8], desc2: &[u8]) -> f64 {
        plan.terms()
            .iter()
            .map(|term| term.weight() * Self::field_distance(plan, desc1, desc2, term) as f64)
            .sum()
    }
}

pub mod packed;
pub mod reference;

#[cfg(feature = "simd")]
pub mod simd;

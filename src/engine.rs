//! Configured entry point for descriptor distance matrices.
//!
//! `DistanceEngine` validates both collections against its layout before any
//! distance is computed, builds a [`DistancePlan`], and dispatches to the
//! sequential or row-parallel matrix driver.

use crate::descriptor::DescriptorSet;
use crate::kernel::reference::ReferenceKernel;
use crate::kernel::{DistancePlan, FieldWeighting, Kernel, Weights};
use crate::layout::DescriptorLayout;
use crate::matrix::{compute_distances, DistanceMatrix};
use crate::util::{AlphaGammaError, AlphaGammaResult};

#[cfg(feature = "rayon")]
use crate::matrix::rayon::compute_distances_par;

// Packed kernel used for `packed_distances` - SIMD when available
#[cfg(not(feature = "simd"))]
use crate::kernel::packed::PackedKernel as FastKernel;
#[cfg(feature = "simd")]
use crate::kernel::simd::PackedSimdKernel as FastKernel;

/// Configuration for distance computations.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConfig {
    /// Field weights `(A, B, G)`.
    pub weights: Weights,
    /// Field weighting override; `None` uses the kernel's own weighting
    /// (separate for the reference kernel, merged for packed kernels).
    pub weighting: Option<FieldWeighting>,
    /// Compute rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            weighting: None,
            parallel: false,
        }
    }
}

impl DistanceConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> AlphaGammaResult<()> {
        self.weights.validate()?;
        if self.parallel && !cfg!(feature = "rayon") {
            return Err(AlphaGammaError::NotImplemented(
                "parallel distances require the `rayon` feature",
            ));
        }
        Ok(())
    }
}

/// Distance engine bound to one descriptor layout.
#[derive(Clone, Debug)]
pub struct DistanceEngine {
    layout: DescriptorLayout,
    config: DistanceConfig,
}

impl DistanceEngine {
    /// Creates an engine with the default configuration.
    pub fn new(layout: DescriptorLayout) -> Self {
        Self {
            layout,
            config: DistanceConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: DistanceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn layout(&self) -> &DescriptorLayout {
        &self.layout
    }

    pub fn config(&self) -> &DistanceConfig {
        &self.config
    }

    /// Validates both collections for kernel `K` and builds the plan.
    pub fn plan_for<K: Kernel>(
        &self,
        set1: DescriptorSet<'_>,
        set2: DescriptorSet<'_>,
    ) -> AlphaGammaResult<DistancePlan> {
        self.config.validate()?;
        let variant = self.layout.detect_variant(set1.rows(), K::ENCODING)?;
        self.layout.detect_variant(set2.rows(), K::ENCODING)?;
        if set1.rows() != set2.rows() {
            return Err(AlphaGammaError::DescriptorLengthMismatch {
                left: set1.rows(),
                right: set2.rows(),
            });
        }
        DistancePlan::for_kernel::<K>(
            self.layout,
            variant,
            self.config.weights,
            self.config.weighting,
        )
    }

    /// Computes the N2×N1 distance matrix with kernel `K`.
    pub fn distances<K: Kernel>(
        &self,
        set1: DescriptorSet<'_>,
        set2: DescriptorSet<'_>,
    ) -> AlphaGammaResult<DistanceMatrix> {
        let plan = self.plan_for::<K>(set1, set2)?;

        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return compute_distances_par::<K>(set1, set2, &plan);
        }

        compute_distances::<K>(set1, set2, &plan)
    }

    /// Distance matrix over unpacked (byte-per-element) descriptors.
    pub fn reference_distances(
        &self,
        set1: DescriptorSet<'_>,
        set2: DescriptorSet<'_>,
    ) -> AlphaGammaResult<DistanceMatrix> {
        self.distances::<ReferenceKernel>(set1, set2)
    }

    /// Distance matrix over packed bitstring descriptors.
    pub fn packed_distances(
        &self,
        set1: DescriptorSet<'_>,
        set2: DescriptorSet<'_>,
    ) -> AlphaGammaResult<DistanceMatrix> {
        self.distances::<FastKernel>(set1, set2)
    }

    /// Distance between a single pair of descriptors with kernel `K`.
    pub fn distance<K: Kernel>(&self, desc1: &[u8], desc2: &[u8]) -> AlphaGammaResult<f64> {
        let set1 = DescriptorSet::single(desc1)?;
        let set2 = DescriptorSet::single(desc2)?;
        let plan = self.plan_for::<K>(set1, set2)?;
        Ok(K::distance(&plan, desc1, desc2))
    }
}

/// Reference distances between two unpacked collections.
pub fn alpha_gamma_distances(
    set1: DescriptorSet<'_>,
    set2: DescriptorSet<'_>,
    num_circles: usize,
    num_rays: usize,
    weights: Weights,
) -> AlphaGammaResult<DistanceMatrix> {
    let layout = DescriptorLayout::new(num_circles, num_rays)?;
    DistanceEngine::new(layout)
        .with_config(DistanceConfig {
            weights,
            ..DistanceConfig::default()
        })
        .reference_distances(set1, set2)
}

/// Packed popcount distances between two packed collections.
pub fn alpha_gamma_distances_fast(
    set1: DescriptorSet<'_>,
    set2: DescriptorSet<'_>,
    num_circles: usize,
    num_rays: usize,
    weights: Weights,
) -> AlphaGammaResult<DistanceMatrix> {
    let layout = DescriptorLayout::new(num_circles, num_rays)?;
    DistanceEngine::new(layout)
        .with_config(DistanceConfig {
            weights,
            ..DistanceConfig::default()
        })
        .packed_distances(set1, set2)
}

//! σ-coordinate vertical levels.
//!
//! The vertical coordinate is σ = p/p_s ∈ [0, 1], with layers indexed
//! k = 0 … nlev−1 from the model top down and half levels k±½ between them.
//! Layer thicknesses Δσₖ partition the unit interval:
//!
//! ```text
//! Σₖ Δσₖ = 1
//! ```
//!
//! All derived tables (full-level σ, the σ̇ → d(ln p)/dt projection
//! coefficients Aₖ, Bₖ, and the hydrostatic R_d·ln σ increments) are
//! precomputed at construction and read-only afterwards.

use crate::error::ModelError;

/// Vertical σ-level metadata shared by all columns.
#[derive(Clone, Debug)]
pub struct SigmaLevels {
    nlev: usize,
    /// Half-level σ values, length nlev+1, from 0 (top) to 1 (surface).
    sigma_half: Vec<f64>,
    /// Full-level σ values (layer midpoints), length nlev.
    sigma_full: Vec<f64>,
    /// Layer thicknesses Δσₖ = σ_{k+½} − σ_{k−½}.
    dsigma: Vec<f64>,
    /// 1/(2Δσₖ), the centered vertical-advection factor.
    dsigma2_inv: Vec<f64>,
    /// Aₖ: weight of the σ̇ flux above the layer in the d(ln p)/dt projection.
    /// A₀ = 0 (the top half-level flux vanishes identically).
    lnp_weight_above: Vec<f64>,
    /// Bₖ: weight of the σ̇ flux below the layer.
    lnp_weight_below: Vec<f64>,
}

impl SigmaLevels {
    /// Equally spaced σ levels, Δσₖ = 1/nlev.
    pub fn uniform(nlev: usize) -> Self {
        let sigma_half: Vec<f64> = (0..=nlev).map(|k| k as f64 / nlev as f64).collect();
        Self::from_half_levels(sigma_half).expect("uniform levels are a valid partition")
    }

    /// Build from explicit half levels; they must increase monotonically from
    /// 0 to 1 so the layer thicknesses partition the unit interval.
    pub fn from_half_levels(sigma_half: Vec<f64>) -> Result<Self, ModelError> {
        if sigma_half.len() < 2
            || sigma_half[0] != 0.0
            || *sigma_half.last().unwrap() != 1.0
            || sigma_half.windows(2).any(|w| w[1] <= w[0])
        {
            return Err(ModelError::SigmaHalfLevels);
        }
        let nlev = sigma_half.len() - 1;

        let dsigma: Vec<f64> = (0..nlev).map(|k| sigma_half[k + 1] - sigma_half[k]).collect();
        let sum: f64 = dsigma.iter().sum();
        if (sum - 1.0).abs() > 1e-12 {
            return Err(ModelError::SigmaPartition { sum });
        }

        let sigma_full: Vec<f64> = (0..nlev)
            .map(|k| 0.5 * (sigma_half[k] + sigma_half[k + 1]))
            .collect();
        let dsigma2_inv: Vec<f64> = dsigma.iter().map(|&d| 1.0 / (2.0 * d)).collect();

        // σ̇ ∂lnσ/∂σ at full levels, split between the two half-level fluxes:
        // Aₖ = ln(σₖ/σ_{k−½})/Δσₖ, Bₖ = ln(σ_{k+½}/σₖ)/Δσₖ. The top half
        // level has σ = 0; its flux is identically zero, so A₀ = 0.
        let mut lnp_weight_above = vec![0.0; nlev];
        let mut lnp_weight_below = vec![0.0; nlev];
        for k in 0..nlev {
            if k > 0 {
                lnp_weight_above[k] = (sigma_full[k] / sigma_half[k]).ln() / dsigma[k];
            }
            lnp_weight_below[k] = (sigma_half[k + 1] / sigma_full[k]).ln() / dsigma[k];
        }

        Ok(Self {
            nlev,
            sigma_half,
            sigma_full,
            dsigma,
            dsigma2_inv,
            lnp_weight_above,
            lnp_weight_below,
        })
    }

    /// Number of layers.
    #[inline]
    pub fn nlev(&self) -> usize {
        self.nlev
    }

    /// Half-level σ values (length nlev+1).
    #[inline]
    pub fn sigma_half(&self) -> &[f64] {
        &self.sigma_half
    }

    /// Full-level σ values (length nlev).
    #[inline]
    pub fn sigma_full(&self) -> &[f64] {
        &self.sigma_full
    }

    /// Layer thicknesses Δσₖ.
    #[inline]
    pub fn dsigma(&self) -> &[f64] {
        &self.dsigma
    }

    /// 1/(2Δσₖ) for centered vertical advection.
    #[inline]
    pub fn dsigma2_inv(&self, k: usize) -> f64 {
        self.dsigma2_inv[k]
    }

    /// Aₖ: projection weight of σ̇_{k−½} onto d(ln p)/dt at layer k.
    #[inline]
    pub fn lnp_weight_above(&self, k: usize) -> f64 {
        self.lnp_weight_above[k]
    }

    /// Bₖ: projection weight of σ̇_{k+½}.
    #[inline]
    pub fn lnp_weight_below(&self, k: usize) -> f64 {
        self.lnp_weight_below[k]
    }

    /// Assert a per-layer table has nlev entries.
    #[inline]
    #[track_caller]
    pub fn check_nlev(&self, n: usize) {
        assert_eq!(n, self.nlev, "layer count {} does not match nlev {}", n, self.nlev);
    }
}

//! Hydrostatic geopotential on σ levels.
//!
//! Integrates the hydrostatic balance upward from the surface geopotential,
//! layer temperature by layer temperature:
//!
//! ```text
//! Φ_{k}   = Φ_{k+½} + R_d·T_k·ln(σ_{k+½}/σ_k)
//! Φ_{k−½} = Φ_k     + R_d·T_k·ln(σ_k/σ_{k−½})
//! ```
//!
//! The increments are linear in the spectral temperature, so the integration
//! runs directly on the packed coefficient arrays.

use crate::constants::Atmosphere;
use crate::spectral::SpectralCoeffs;
use crate::state::{DiagnosticVariables, PrognosticVariables};
use crate::vertical::SigmaLevels;

/// Precomputed R_d·ln σ increments for the hydrostatic integration.
#[derive(Clone, Debug)]
pub struct Geopotential {
    /// R_d·ln(σ_{k+½}/σ_k): from the half level below layer k to the layer.
    above: Vec<f64>,
    /// R_d·ln(σ_k/σ_{k−½}): from layer k to the half level above it.
    /// Unused at k = 0 (the top half level is never integrated to).
    below: Vec<f64>,
    /// Running half-level geopotential during integration.
    scratch: SpectralCoeffs,
}

impl Geopotential {
    /// Precompute increments for the given σ levels and gas constant.
    pub fn new(trunc: usize, sigma: &SigmaLevels, atmosphere: &Atmosphere) -> Self {
        let nlev = sigma.nlev();
        let half = sigma.sigma_half();
        let full = sigma.sigma_full();

        let mut above = vec![0.0; nlev];
        let mut below = vec![0.0; nlev];
        for k in 0..nlev {
            above[k] = atmosphere.r_dry * (half[k + 1] / full[k]).ln();
            if k > 0 {
                below[k] = atmosphere.r_dry * (full[k] / half[k]).ln();
            }
        }

        Self {
            above,
            below,
            scratch: SpectralCoeffs::zeros(trunc),
        }
    }

    /// Integrate Φₖ for every layer into the per-layer `geopot` scratch,
    /// starting from the spectral surface geopotential.
    pub fn compute(
        &mut self,
        progn: &PrognosticVariables,
        diagn: &mut DiagnosticVariables,
        geopot_surf: &SpectralCoeffs,
        lf: usize,
    ) {
        let nlev = diagn.nlev();
        assert_eq!(nlev, self.above.len(), "geopotential sized for {} layers", self.above.len());

        // half-level geopotential, surface upward
        self.scratch.copy_from(geopot_surf);
        for k in (0..nlev).rev() {
            let temp = &progn.layers[k].temp[lf];
            let geopot = &mut diagn.layers[k].dynamics.geopot;
            geopot.copy_from(&self.scratch);
            geopot.axpy(self.above[k], temp);
            if k > 0 {
                self.scratch.copy_from(geopot);
                self.scratch.axpy(self.below[k], temp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_isothermal_column() {
        // For T ≡ T₀ the full-level geopotential is
        // Φ_k = Φ_s + R_d·T₀·ln(1/σ_k).
        let atm = Atmosphere::default();
        let sigma = SigmaLevels::uniform(4);
        let mut geo = Geopotential::new(5, &sigma, &atm);

        let t0 = 280.0;
        let mut progn = PrognosticVariables::zeros(5, 4);
        for layer in &mut progn.layers {
            layer.temp[0].set(0, 0, Complex64::new(t0, 0.0));
        }
        let mut diagn = DiagnosticVariables::zeros(5, 4, 8);
        let phi_s = SpectralCoeffs::zeros(5);

        geo.compute(&progn, &mut diagn, &phi_s, 0);

        for k in 0..4 {
            let expected = atm.r_dry * t0 * (1.0 / sigma.sigma_full()[k]).ln();
            let got = diagn.layers[k].dynamics.geopot.get(0, 0).re;
            assert!(
                (got - expected).abs() < 1e-9 * expected.abs().max(1.0),
                "layer {}: {} vs {}",
                k,
                got,
                expected
            );
        }
        // geopotential decreases downward
        for k in 1..4 {
            assert!(
                diagn.layers[k].dynamics.geopot.get(0, 0).re
                    < diagn.layers[k - 1].dynamics.geopot.get(0, 0).re
            );
        }
    }
}

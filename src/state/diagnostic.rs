//! Diagnostic scratch state: grid-space fields, per-layer dynamics work
//! arrays, surface scratch, and the tendency arrays the engine writes.
//!
//! Every buffer is allocated once, sized to the chosen truncation and grid,
//! and reused for the lifetime of the simulation. Ownership is exclusive per
//! layer; the only cross-layer reads are the vertical-neighbor accesses of
//! the vertical velocity and advection steps.

use crate::spectral::SpectralCoeffs;

/// Grid-space images of the prognostic fields for one layer, restored by the
/// `gridded` step at the start of every tendency evaluation.
#[derive(Clone, Debug)]
pub struct GridVariables {
    /// U = u·cosφ on the grid.
    pub u_grid: Vec<f64>,
    /// V = v·cosφ on the grid.
    pub v_grid: Vec<f64>,
    pub vor_grid: Vec<f64>,
    pub div_grid: Vec<f64>,
    pub temp_grid: Vec<f64>,
    pub humid_grid: Vec<f64>,
    /// Virtual temperature Tᵥ = T·(1 + (R_v/R_d − 1)·q); equals T for a dry core.
    pub temp_virt_grid: Vec<f64>,
}

impl GridVariables {
    fn zeros(n_points: usize) -> Self {
        Self {
            u_grid: vec![0.0; n_points],
            v_grid: vec![0.0; n_points],
            vor_grid: vec![0.0; n_points],
            div_grid: vec![0.0; n_points],
            temp_grid: vec![0.0; n_points],
            humid_grid: vec![0.0; n_points],
            temp_virt_grid: vec![0.0; n_points],
        }
    }
}

/// General and layer-specific work arrays, owned exclusively by one layer.
#[derive(Clone, Debug)]
pub struct DynamicsVariables {
    /// General spectral work array, clobbered by flux-divergence calls.
    pub a: SpectralCoeffs,
    /// Second general spectral work array.
    pub b: SpectralCoeffs,
    pub a_grid: Vec<f64>,
    pub b_grid: Vec<f64>,
    /// Spectral U = u·cosφ, written by `uv_from_vordiv` during `gridded`.
    pub u_coslat: SpectralCoeffs,
    pub v_coslat: SpectralCoeffs,
    /// σ̇ mass flux at the half level below this layer (σ_tend_{k+½}).
    /// Top and bottom column boundaries are identically zero; the bottom
    /// layer's buffer stays zeroed.
    pub sigma_tend: Vec<f64>,
    /// Like `sigma_tend` but accumulating the uv·∇lnp term only; kept as a
    /// separate buffer (aliasing the two corrupts the vertical advection).
    pub sigma_m: Vec<f64>,
    /// (U − Ū)·∂λ lnp_s + (V − V̄)·∂φ lnp_s on the grid.
    pub uv_grad_lnp: Vec<f64>,
    /// Vertical advection of ln p_s: Aₖ·σ̇_{k−½} + Bₖ·σ̇_{k+½}.
    pub vert_adv_lnp: Vec<f64>,
    /// Bernoulli potential ½(u² + v²) + Φ, spectral.
    pub bernoulli: SpectralCoeffs,
    pub bernoulli_grid: Vec<f64>,
    /// Hydrostatic geopotential Φₖ, spectral.
    pub geopot: SpectralCoeffs,
}

impl DynamicsVariables {
    fn zeros(trunc: usize, n_points: usize) -> Self {
        Self {
            a: SpectralCoeffs::zeros(trunc),
            b: SpectralCoeffs::zeros(trunc),
            a_grid: vec![0.0; n_points],
            b_grid: vec![0.0; n_points],
            u_coslat: SpectralCoeffs::zeros(trunc),
            v_coslat: SpectralCoeffs::zeros(trunc),
            sigma_tend: vec![0.0; n_points],
            sigma_m: vec![0.0; n_points],
            uv_grad_lnp: vec![0.0; n_points],
            vert_adv_lnp: vec![0.0; n_points],
            bernoulli: SpectralCoeffs::zeros(trunc),
            bernoulli_grid: vec![0.0; n_points],
            geopot: SpectralCoeffs::zeros(trunc),
        }
    }
}

/// Tendencies of one layer, overwritten every evaluation.
#[derive(Clone, Debug)]
pub struct LayerTendencies {
    pub vor_tend: SpectralCoeffs,
    pub div_tend: SpectralCoeffs,
    pub temp_tend: SpectralCoeffs,
    pub humid_tend: SpectralCoeffs,
    /// Grid-space momentum tendency accumulators (u·cosφ form until the
    /// cos⁻²φ scaling of the vorticity/divergence step).
    pub u_tend_grid: Vec<f64>,
    pub v_tend_grid: Vec<f64>,
    pub temp_tend_grid: Vec<f64>,
    pub humid_tend_grid: Vec<f64>,
}

impl LayerTendencies {
    fn zeros(trunc: usize, n_points: usize) -> Self {
        Self {
            vor_tend: SpectralCoeffs::zeros(trunc),
            div_tend: SpectralCoeffs::zeros(trunc),
            temp_tend: SpectralCoeffs::zeros(trunc),
            humid_tend: SpectralCoeffs::zeros(trunc),
            u_tend_grid: vec![0.0; n_points],
            v_tend_grid: vec![0.0; n_points],
            temp_tend_grid: vec![0.0; n_points],
            humid_tend_grid: vec![0.0; n_points],
        }
    }

    fn reset(&mut self, with_humidity: bool) {
        self.vor_tend.fill_zero();
        self.div_tend.fill_zero();
        self.temp_tend.fill_zero();
        self.u_tend_grid.fill(0.0);
        self.v_tend_grid.fill(0.0);
        self.temp_tend_grid.fill(0.0);
        if with_humidity {
            self.humid_tend.fill_zero();
            self.humid_tend_grid.fill(0.0);
        }
    }
}

/// All diagnostic state of one layer.
#[derive(Clone, Debug)]
pub struct DiagnosticLayer {
    pub grid: GridVariables,
    pub dynamics: DynamicsVariables,
    pub tendencies: LayerTendencies,
}

/// Surface (single-level) diagnostic state.
#[derive(Clone, Debug)]
pub struct SurfaceVariables {
    /// ln(p_s/p_ref) on the grid (η for shallow water).
    pub pres_grid: Vec<f64>,
    pub dpres_dlon: SpectralCoeffs,
    pub dpres_dlat: SpectralCoeffs,
    pub dpres_dlon_grid: Vec<f64>,
    pub dpres_dlat_grid: Vec<f64>,
    /// Vertical means, Δσ-weighted.
    pub u_mean_grid: Vec<f64>,
    pub v_mean_grid: Vec<f64>,
    pub div_mean_grid: Vec<f64>,
    pub div_mean: SpectralCoeffs,
    pub pres_tend: SpectralCoeffs,
    pub pres_tend_grid: Vec<f64>,
}

impl SurfaceVariables {
    fn zeros(trunc: usize, n_points: usize) -> Self {
        Self {
            pres_grid: vec![0.0; n_points],
            dpres_dlon: SpectralCoeffs::zeros(trunc),
            dpres_dlat: SpectralCoeffs::zeros(trunc),
            dpres_dlon_grid: vec![0.0; n_points],
            dpres_dlat_grid: vec![0.0; n_points],
            u_mean_grid: vec![0.0; n_points],
            v_mean_grid: vec![0.0; n_points],
            div_mean_grid: vec![0.0; n_points],
            div_mean: SpectralCoeffs::zeros(trunc),
            pres_tend: SpectralCoeffs::zeros(trunc),
            pres_tend_grid: vec![0.0; n_points],
        }
    }
}

/// Complete diagnostic state for one simulation.
#[derive(Clone, Debug)]
pub struct DiagnosticVariables {
    pub layers: Vec<DiagnosticLayer>,
    pub surface: SurfaceVariables,
    n_points: usize,
}

impl DiagnosticVariables {
    /// Allocate all scratch for the given truncation, grid size and layers.
    pub fn zeros(trunc: usize, nlev: usize, n_points: usize) -> Self {
        Self {
            layers: (0..nlev)
                .map(|_| DiagnosticLayer {
                    grid: GridVariables::zeros(n_points),
                    dynamics: DynamicsVariables::zeros(trunc, n_points),
                    tendencies: LayerTendencies::zeros(trunc, n_points),
                })
                .collect(),
            surface: SurfaceVariables::zeros(trunc, n_points),
            n_points,
        }
    }

    /// Number of σ layers.
    #[inline]
    pub fn nlev(&self) -> usize {
        self.layers.len()
    }

    /// Grid points per horizontal field.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Reset every tendency array; called at the start of each evaluation.
    /// A dry core never touches the humidity arrays, not even to zero them.
    pub fn reset_tendencies(&mut self, with_humidity: bool) {
        for layer in &mut self.layers {
            layer.tendencies.reset(with_humidity);
        }
        self.surface.pres_tend.fill_zero();
        self.surface.pres_tend_grid.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_allocation() {
        let diagn = DiagnosticVariables::zeros(10, 3, 128);
        assert_eq!(diagn.nlev(), 3);
        assert_eq!(diagn.layers[2].grid.u_grid.len(), 128);
        assert_eq!(diagn.layers[0].dynamics.a.trunc(), 10);
        assert_eq!(diagn.surface.pres_tend_grid.len(), 128);
    }

    #[test]
    fn test_sigma_buffers_are_distinct() {
        let mut diagn = DiagnosticVariables::zeros(5, 2, 16);
        diagn.layers[0].dynamics.sigma_tend[3] = 1.0;
        assert_eq!(diagn.layers[0].dynamics.sigma_m[3], 0.0);
    }

    #[test]
    fn test_reset_tendencies() {
        let mut diagn = DiagnosticVariables::zeros(5, 2, 16);
        diagn.layers[1].tendencies.vor_tend.set(1, 0, Complex64::new(1.0, 0.0));
        diagn.layers[1].tendencies.u_tend_grid[0] = 2.0;
        diagn.surface.pres_tend.set(1, 0, Complex64::new(3.0, 0.0));
        diagn.reset_tendencies(true);
        assert_eq!(diagn.layers[1].tendencies.vor_tend.get(1, 0), Complex64::new(0.0, 0.0));
        assert_eq!(diagn.layers[1].tendencies.u_tend_grid[0], 0.0);
        assert_eq!(diagn.surface.pres_tend.get(1, 0), Complex64::new(0.0, 0.0));
    }
}

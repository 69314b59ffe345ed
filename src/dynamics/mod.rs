//! The tendency engine: one right-hand-side evaluation of the primitive,
//! shallow-water or barotropic equations.
//!
//! `Model::tendencies` restores grid-space fields from the spectral
//! prognostic state, runs the tier's tendency sequence in strict order, and
//! leaves spectral tendencies (truncated to l ≤ L) in the diagnostic state
//! for the time integrator to consume.

pub mod geopotential;
pub mod primitive;
pub mod shallow_water;

pub use geopotential::Geopotential;

use crate::grid::RingGrid;
use crate::model::{Model, ModelTier};
use crate::spectral::{SpectralCoeffs, SpectralTransform};
use crate::state::{DiagnosticVariables, DynamicsVariables, PrognosticVariables};

impl Model {
    /// Evaluate all tendencies for the current leapfrog slice `lf` at model
    /// time `time` (seconds).
    ///
    /// Tendency arrays are reset first; everything the previous evaluation
    /// left there is overwritten.
    pub fn tendencies(
        &mut self,
        progn: &PrognosticVariables,
        diagn: &mut DiagnosticVariables,
        lf: usize,
        time: f64,
    ) {
        assert_eq!(progn.trunc(), self.transform.trunc(), "state/model truncation mismatch");
        assert_eq!(progn.nlev(), diagn.nlev(), "prognostic/diagnostic nlev mismatch");
        assert_eq!(diagn.n_points(), self.grid.n_points(), "diagnostic/grid shape mismatch");

        diagn.reset_tendencies(!self.dry_core);

        match self.tier {
            ModelTier::Barotropic => shallow_water::barotropic_tendencies(self, progn, diagn, lf),
            ModelTier::ShallowWater => {
                shallow_water::shallow_water_tendencies(self, progn, diagn, lf, time)
            }
            ModelTier::PrimitiveEquation => {
                primitive::primitive_tendencies(self, progn, diagn, lf)
            }
        }

        // nothing above l = L leaves the core
        let wet = !self.dry_core;
        for layer in &mut diagn.layers {
            layer.tendencies.vor_tend.truncate();
            layer.tendencies.div_tend.truncate();
            layer.tendencies.temp_tend.truncate();
            if wet {
                layer.tendencies.humid_tend.truncate();
            }
        }
        diagn.surface.pres_tend.truncate();
    }
}

/// Accumulate −∇·((u,v)·A) into `out`.
///
/// Pre-scales A·cos⁻²φ on the grid, multiplies ring-wise by the
/// u·cosφ-scaled velocities, transforms both products and calls the
/// divergence with `add = true, flipsign = true`. `scalar_grid` is
/// read-only; the layer's `a`, `b`, `a_grid`, `b_grid` scratch is clobbered.
pub(crate) fn flux_divergence(
    transform: &mut SpectralTransform,
    grid: &RingGrid,
    dynamics: &mut DynamicsVariables,
    scalar_grid: &[f64],
    u_grid: &[f64],
    v_grid: &[f64],
    out: &mut SpectralCoeffs,
) {
    grid.check_shape(scalar_grid);
    grid.check_shape(u_grid);
    grid.check_shape(v_grid);

    for ring in grid.rings() {
        let r2 = ring.coslat_recip2;
        for ij in ring.range {
            let s = scalar_grid[ij] * r2;
            dynamics.a_grid[ij] = u_grid[ij] * s;
            dynamics.b_grid[ij] = v_grid[ij] * s;
        }
    }

    transform.forward(&dynamics.a_grid, &mut dynamics.a);
    transform.forward(&dynamics.b_grid, &mut dynamics.b);
    transform.divergence(&dynamics.a, &dynamics.b, out, true, true);
}

//! Single-layer tendencies: barotropic vorticity and shallow water.
//!
//! The barotropic tier advects absolute vorticity only. Shallow water adds
//! the divergence equation (vorticity-flux curl minus the Laplacian of the
//! Bernoulli potential) and the continuity equation for the interface
//! displacement, with orography entering through the layer thickness.

use crate::grid::RingGrid;
use crate::model::Model;
use crate::spectral::SpectralTransform;
use crate::state::{DiagnosticLayer, DiagnosticVariables, PrognosticVariables};

/// Barotropic vorticity equation: ∂ζ/∂t = −∇·((u, v)(ζ + f)).
pub fn barotropic_tendencies(
    model: &mut Model,
    progn: &PrognosticVariables,
    diagn: &mut DiagnosticVariables,
    lf: usize,
) {
    let Model {
        grid, transform, ..
    } = model;
    let player = &progn.layers[0];
    let dlayer = &mut diagn.layers[0];

    // gridded: velocities from vorticity alone, divergence-free
    transform.uv_from_vor(
        &player.vor[lf],
        &mut dlayer.dynamics.u_coslat,
        &mut dlayer.dynamics.v_coslat,
    );
    transform.inverse(&dlayer.dynamics.u_coslat, &mut dlayer.grid.u_grid);
    transform.inverse(&dlayer.dynamics.v_coslat, &mut dlayer.grid.v_grid);
    transform.inverse(&player.vor[lf], &mut dlayer.grid.vor_grid);

    vorticity_flux(dlayer, grid, transform, false);
}

/// Shallow-water tendencies: vorticity, divergence and continuity.
pub fn shallow_water_tendencies(
    model: &mut Model,
    progn: &PrognosticVariables,
    diagn: &mut DiagnosticVariables,
    lf: usize,
    time: f64,
) {
    let Model {
        grid,
        transform,
        planet,
        boundaries,
        relaxation,
        layer_depth,
        ..
    } = model;
    let player = &progn.layers[0];
    let dlayer = &mut diagn.layers[0];
    let surface = &mut diagn.surface;

    // gridded
    transform.uv_from_vordiv(
        &player.vor[lf],
        &player.div[lf],
        &mut dlayer.dynamics.u_coslat,
        &mut dlayer.dynamics.v_coslat,
    );
    transform.inverse(&dlayer.dynamics.u_coslat, &mut dlayer.grid.u_grid);
    transform.inverse(&dlayer.dynamics.v_coslat, &mut dlayer.grid.v_grid);
    transform.inverse(&player.vor[lf], &mut dlayer.grid.vor_grid);
    transform.inverse(&player.div[lf], &mut dlayer.grid.div_grid);
    transform.inverse(&progn.pres[lf], &mut surface.pres_grid);

    // ∂ζ/∂t = −∇·(flux), ∂D/∂t = ∇×(flux)
    vorticity_flux(dlayer, grid, transform, true);

    // ∂D/∂t −= ∇²B with B = ½(u² + v²) + g·η
    {
        let DiagnosticLayer {
            grid: fields,
            dynamics,
            tendencies,
        } = dlayer;
        for ring in grid.rings() {
            let r2 = ring.coslat_recip2;
            for ij in ring.range {
                dynamics.bernoulli_grid[ij] = 0.5
                    * (fields.u_grid[ij] * fields.u_grid[ij]
                        + fields.v_grid[ij] * fields.v_grid[ij])
                    * r2
                    + planet.gravity * surface.pres_grid[ij];
            }
        }
        transform.forward(&dynamics.bernoulli_grid, &mut dynamics.bernoulli);
        transform.laplacian(&dynamics.bernoulli, &mut tendencies.div_tend, true, true);
    }

    // continuity: ∂η/∂t = −∇·((u, v)·h) with thickness h = η + H₀ − h_s
    {
        let DiagnosticLayer {
            grid: fields,
            dynamics,
            ..
        } = dlayer;
        for ring in grid.rings() {
            let r2 = ring.coslat_recip2;
            for ij in ring.range {
                let h = surface.pres_grid[ij] + *layer_depth - boundaries.orography[ij];
                dynamics.a_grid[ij] = fields.u_grid[ij] * h * r2;
                dynamics.b_grid[ij] = fields.v_grid[ij] * h * r2;
            }
        }
        transform.forward(&dynamics.a_grid, &mut dynamics.a);
        transform.forward(&dynamics.b_grid, &mut dynamics.b);
        transform.divergence(&dynamics.a, &dynamics.b, &mut surface.pres_tend, true, true);
    }

    if let Some(relax) = relaxation {
        relax.apply(time, &progn.pres[lf], &mut surface.pres_tend);
    }
}

/// Absolute-vorticity flux: divergence into the vorticity tendency
/// (flipped), optionally curl into the divergence tendency.
///
/// The flux (u, v)·(ζ + f)/cosφ is assembled ring-wise as
/// (U, V)·(ζ + f)·cos⁻²φ, the scaling the spectral divergence/curl expect.
fn vorticity_flux(
    layer: &mut DiagnosticLayer,
    grid: &RingGrid,
    transform: &mut SpectralTransform,
    with_divergence_tendency: bool,
) {
    let DiagnosticLayer {
        grid: fields,
        dynamics,
        tendencies,
    } = layer;

    for ring in grid.rings() {
        let f = ring.coriolis;
        let r2 = ring.coslat_recip2;
        for ij in ring.range {
            let omega = (fields.vor_grid[ij] + f) * r2;
            dynamics.a_grid[ij] = fields.u_grid[ij] * omega;
            dynamics.b_grid[ij] = fields.v_grid[ij] * omega;
        }
    }

    transform.forward(&dynamics.a_grid, &mut dynamics.a);
    transform.forward(&dynamics.b_grid, &mut dynamics.b);
    transform.divergence(&dynamics.a, &dynamics.b, &mut tendencies.vor_tend, true, true);
    if with_divergence_tendency {
        transform.curl(&dynamics.a, &dynamics.b, &mut tendencies.div_tend, true, false);
    }
}

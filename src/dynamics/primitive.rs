//! Primitive-equation tendencies on σ levels.
//!
//! One evaluation runs, in strict order: `gridded`, `vertical_averages`,
//! `surface_pressure_tendency`, `vertical_velocity`, `vertical_advection`,
//! `vordiv_tendencies`, `temperature_tendency`, `humidity_tendency` (wet
//! cores only), then the hydrostatic geopotential and `bernoulli_potential`.
//! The vertical-velocity recursion is the only strictly sequential step in
//! the vertical; everything else is independent per layer.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::flux_divergence;
use crate::constants::Atmosphere;
use crate::grid::RingGrid;
use crate::model::Model;
use crate::spectral::SpectralTransform;
use crate::state::{DiagnosticLayer, DiagnosticVariables, PrognosticVariables, SurfaceVariables};
use crate::vertical::SigmaLevels;
use num_complex::Complex64;

/// Full primitive-equation tendency sequence.
pub fn primitive_tendencies(
    model: &mut Model,
    progn: &PrognosticVariables,
    diagn: &mut DiagnosticVariables,
    lf: usize,
) {
    let Model {
        grid,
        transform,
        sigma,
        atmosphere,
        boundaries,
        geopotential,
        dry_core,
        ..
    } = model;
    let dry = *dry_core;

    gridded(progn, diagn, transform, atmosphere, dry, lf);
    vertical_averages(progn, diagn, sigma, lf);
    surface_pressure_tendency(progn, diagn, grid, transform, lf);
    vertical_velocity(diagn, sigma, grid);
    vertical_advection(diagn, sigma, grid, dry);
    vordiv_tendencies(diagn, grid, transform, atmosphere);
    temperature_tendency(diagn, grid, transform, atmosphere);
    if !dry {
        humidity_tendency(diagn, grid, transform);
    }
    geopotential.compute(progn, diagn, &boundaries.geopot_surf, lf);
    bernoulli_potential(diagn, grid, transform);
}

/// Restore all grid-space fields from the spectral prognostic state.
///
/// Per layer: (U, V) from (ζ, D) followed by inverse transforms of the
/// velocities and of ζ, D, T (and q for wet cores); the virtual temperature
/// Tᵥ = T·(1 + (R_v/R_d − 1)·q) is formed point-wise. For the surface,
/// ln p_s is brought to the grid.
pub fn gridded(
    progn: &PrognosticVariables,
    diagn: &mut DiagnosticVariables,
    transform: &mut SpectralTransform,
    atmosphere: &Atmosphere,
    dry_core: bool,
    lf: usize,
) {
    let mu = atmosphere.mu_virt();
    for (player, dlayer) in progn.layers.iter().zip(diagn.layers.iter_mut()) {
        let dynamics = &mut dlayer.dynamics;
        let fields = &mut dlayer.grid;

        transform.uv_from_vordiv(
            &player.vor[lf],
            &player.div[lf],
            &mut dynamics.u_coslat,
            &mut dynamics.v_coslat,
        );
        transform.inverse(&dynamics.u_coslat, &mut fields.u_grid);
        transform.inverse(&dynamics.v_coslat, &mut fields.v_grid);
        transform.inverse(&player.vor[lf], &mut fields.vor_grid);
        transform.inverse(&player.div[lf], &mut fields.div_grid);
        transform.inverse(&player.temp[lf], &mut fields.temp_grid);

        if dry_core {
            fields.temp_virt_grid.copy_from_slice(&fields.temp_grid);
        } else {
            transform.inverse(&player.humid[lf], &mut fields.humid_grid);
            for ((tv, &t), &q) in fields
                .temp_virt_grid
                .iter_mut()
                .zip(fields.temp_grid.iter())
                .zip(fields.humid_grid.iter())
            {
                *tv = t * (1.0 + mu * q);
            }
        }
    }

    transform.inverse(&progn.pres[lf], &mut diagn.surface.pres_grid);
}

/// Δσ-weighted vertical means Ū, V̄, D̄ in grid space and D̄ in spectral
/// space. Accumulators are reset first.
pub fn vertical_averages(
    progn: &PrognosticVariables,
    diagn: &mut DiagnosticVariables,
    sigma: &SigmaLevels,
    lf: usize,
) {
    sigma.check_nlev(diagn.nlev());
    let surface = &mut diagn.surface;
    surface.u_mean_grid.fill(0.0);
    surface.v_mean_grid.fill(0.0);
    surface.div_mean_grid.fill(0.0);
    surface.div_mean.fill_zero();

    for (k, (player, dlayer)) in progn.layers.iter().zip(diagn.layers.iter()).enumerate() {
        let w = sigma.dsigma()[k];
        for (mean, &val) in surface.u_mean_grid.iter_mut().zip(dlayer.grid.u_grid.iter()) {
            *mean += w * val;
        }
        for (mean, &val) in surface.v_mean_grid.iter_mut().zip(dlayer.grid.v_grid.iter()) {
            *mean += w * val;
        }
        for (mean, &val) in surface.div_mean_grid.iter_mut().zip(dlayer.grid.div_grid.iter()) {
            *mean += w * val;
        }
        surface.div_mean.axpy(w, &player.div[lf]);
    }
}

/// Tendency of ln p_s: −(Ū, V̄)·∇ln p_s − D̄, with the global mean forced to
/// zero for mass conservation.
///
/// Also leaves ∇ln p_s in spectral and grid form for the vertical-velocity
/// and momentum steps.
pub fn surface_pressure_tendency(
    progn: &PrognosticVariables,
    diagn: &mut DiagnosticVariables,
    grid: &RingGrid,
    transform: &mut SpectralTransform,
    lf: usize,
) {
    let surface = &mut diagn.surface;
    let pres = &progn.pres[lf];

    transform.gradient_lon(pres, &mut surface.dpres_dlon, false, false);
    transform.gradient_lat(pres, &mut surface.dpres_dlat, false, false);
    transform.inverse(&surface.dpres_dlon, &mut surface.dpres_dlon_grid);
    transform.inverse(&surface.dpres_dlat, &mut surface.dpres_dlat_grid);

    for ring in grid.rings() {
        let r2 = ring.coslat_recip2;
        for ij in ring.range {
            surface.pres_tend_grid[ij] = -(surface.u_mean_grid[ij]
                * surface.dpres_dlon_grid[ij]
                + surface.v_mean_grid[ij] * surface.dpres_dlat_grid[ij])
                * r2;
        }
    }

    transform.forward(&surface.pres_tend_grid, &mut surface.pres_tend);
    surface.pres_tend.axpy(-1.0, &surface.div_mean);
    surface.pres_tend.set(0, 0, Complex64::new(0.0, 0.0));
}

/// Vertical σ̇ mass fluxes at the interior half levels, top to bottom.
///
/// Per layer k: uv∇lnpₖ = (Uₖ − Ū)·∂λ lnp_s + (Vₖ − V̄)·∂φ lnp_s, then the
/// recursion σ̇_{k+½} = σ̇_{k−½} − Δσₖ·(uv∇lnpₖ + Dₖ − D̄), with the
/// analogous `sigma_m` accumulating the uv∇lnp term only. The top and bottom
/// half-level fluxes are identically zero; the bottom layer's buffers are
/// zeroed rather than computed (they telescope to roundoff anyway).
pub fn vertical_velocity(diagn: &mut DiagnosticVariables, sigma: &SigmaLevels, grid: &RingGrid) {
    let nlev = diagn.nlev();
    sigma.check_nlev(nlev);
    let surface = &diagn.surface;
    let layers = &mut diagn.layers;

    for k in 0..nlev {
        let (above, rest) = layers.split_at_mut(k);
        let layer = &mut rest[0];
        let above = above.last();

        for ring in grid.rings() {
            let r2 = ring.coslat_recip2;
            for ij in ring.range {
                layer.dynamics.uv_grad_lnp[ij] = ((layer.grid.u_grid[ij]
                    - surface.u_mean_grid[ij])
                    * surface.dpres_dlon_grid[ij]
                    + (layer.grid.v_grid[ij] - surface.v_mean_grid[ij])
                        * surface.dpres_dlat_grid[ij])
                    * r2;
            }
        }

        if k < nlev - 1 {
            let dsk = sigma.dsigma()[k];
            for ij in 0..layer.dynamics.sigma_tend.len() {
                let (flux_above, m_above) = match above {
                    Some(l) => (l.dynamics.sigma_tend[ij], l.dynamics.sigma_m[ij]),
                    None => (0.0, 0.0),
                };
                layer.dynamics.sigma_tend[ij] = flux_above
                    - dsk
                        * (layer.dynamics.uv_grad_lnp[ij] + layer.grid.div_grid[ij]
                            - surface.div_mean_grid[ij]);
                layer.dynamics.sigma_m[ij] = m_above - dsk * layer.dynamics.uv_grad_lnp[ij];
            }
        } else {
            layer.dynamics.sigma_tend.fill(0.0);
            layer.dynamics.sigma_m.fill(0.0);
        }
    }
}

/// Centered vertical advection of U, V, T (and q for wet cores) plus the
/// ln p_s vertical-advection term Aₖ·σ̇_{k−½} + Bₖ·σ̇_{k+½}.
///
/// At the column top the half-level flux is zero, so the "above" term
/// vanishes; at the bottom the neighbor read saturates to the layer itself
/// and the bottom half-level flux is zero.
pub fn vertical_advection(
    diagn: &mut DiagnosticVariables,
    sigma: &SigmaLevels,
    grid: &RingGrid,
    dry_core: bool,
) {
    let nlev = diagn.nlev();
    sigma.check_nlev(nlev);
    let n_points = grid.n_points();
    let layers = &mut diagn.layers;

    for k in 0..nlev {
        let (left, rest) = layers.split_at_mut(k);
        let (mid, right) = rest.split_at_mut(1);
        let layer = &mut mid[0];
        let above = left.last();
        let below = right.first();

        let fac = sigma.dsigma2_inv(k);
        let w_above = sigma.lnp_weight_above(k);
        let w_below = sigma.lnp_weight_below(k);

        for ij in 0..n_points {
            let flux_below = layer.dynamics.sigma_tend[ij];
            let flux_above = above.map_or(0.0, |l| l.dynamics.sigma_tend[ij]);

            let advect = |x: f64, x_above: f64, x_below: f64| {
                fac * (flux_above * (x_above - x) + flux_below * (x - x_below))
            };

            let u = layer.grid.u_grid[ij];
            layer.tendencies.u_tend_grid[ij] += advect(
                u,
                above.map_or(u, |l| l.grid.u_grid[ij]),
                below.map_or(u, |l| l.grid.u_grid[ij]),
            );
            let v = layer.grid.v_grid[ij];
            layer.tendencies.v_tend_grid[ij] += advect(
                v,
                above.map_or(v, |l| l.grid.v_grid[ij]),
                below.map_or(v, |l| l.grid.v_grid[ij]),
            );
            let t = layer.grid.temp_grid[ij];
            layer.tendencies.temp_tend_grid[ij] += advect(
                t,
                above.map_or(t, |l| l.grid.temp_grid[ij]),
                below.map_or(t, |l| l.grid.temp_grid[ij]),
            );
            if !dry_core {
                let q = layer.grid.humid_grid[ij];
                layer.tendencies.humid_tend_grid[ij] += advect(
                    q,
                    above.map_or(q, |l| l.grid.humid_grid[ij]),
                    below.map_or(q, |l| l.grid.humid_grid[ij]),
                );
            }

            layer.dynamics.vert_adv_lnp[ij] = w_above * flux_above + w_below * flux_below;
        }
    }
}

fn vordiv_grid_kernel(
    layer: &mut DiagnosticLayer,
    surface: &SurfaceVariables,
    grid: &RingGrid,
    r_dry: f64,
) {
    for ring in grid.rings() {
        let f = ring.coriolis;
        let r2 = ring.coslat_recip2;
        for ij in ring.range {
            let zeta_abs = layer.grid.vor_grid[ij] + f;
            let rtv = r_dry * layer.grid.temp_virt_grid[ij];
            layer.tendencies.u_tend_grid[ij] = (layer.tendencies.u_tend_grid[ij]
                + layer.grid.v_grid[ij] * zeta_abs
                - rtv * surface.dpres_dlon_grid[ij])
                * r2;
            layer.tendencies.v_tend_grid[ij] = (layer.tendencies.v_tend_grid[ij]
                - layer.grid.u_grid[ij] * zeta_abs
                - rtv * surface.dpres_dlat_grid[ij])
                * r2;
        }
    }
}

/// Momentum tendencies: Coriolis/vorticity and pressure-gradient terms in
/// grid space (cos⁻²φ scaled, on top of the vertical advection already
/// accumulated), then curl into the vorticity tendency and divergence into
/// the divergence tendency.
pub fn vordiv_tendencies(
    diagn: &mut DiagnosticVariables,
    grid: &RingGrid,
    transform: &mut SpectralTransform,
    atmosphere: &Atmosphere,
) {
    let surface = &diagn.surface;
    let layers = &mut diagn.layers;
    let r_dry = atmosphere.r_dry;

    // grid kernels are independent per layer
    #[cfg(feature = "parallel")]
    layers
        .par_iter_mut()
        .for_each(|layer| vordiv_grid_kernel(layer, surface, grid, r_dry));
    #[cfg(not(feature = "parallel"))]
    for layer in layers.iter_mut() {
        vordiv_grid_kernel(layer, surface, grid, r_dry);
    }

    for layer in diagn.layers.iter_mut() {
        let DiagnosticLayer {
            dynamics,
            tendencies,
            ..
        } = layer;
        transform.forward(&tendencies.u_tend_grid, &mut dynamics.a);
        transform.forward(&tendencies.v_tend_grid, &mut dynamics.b);
        transform.curl(&dynamics.a, &dynamics.b, &mut tendencies.vor_tend, true, false);
        transform.divergence(&dynamics.a, &dynamics.b, &mut tendencies.div_tend, true, false);
    }
}

/// Temperature tendency: adiabatic conversion and horizontal flux
/// divergence,
/// ∂T/∂t += T·D + κTᵥ·(uv∇lnp − D̄ + vert_adv_lnp) − ∇·((u,v)·T).
pub fn temperature_tendency(
    diagn: &mut DiagnosticVariables,
    grid: &RingGrid,
    transform: &mut SpectralTransform,
    atmosphere: &Atmosphere,
) {
    let surface = &diagn.surface;
    let kappa = atmosphere.kappa;

    for layer in diagn.layers.iter_mut() {
        let DiagnosticLayer {
            grid: fields,
            dynamics,
            tendencies,
        } = layer;

        for ij in 0..fields.temp_grid.len() {
            tendencies.temp_tend_grid[ij] += fields.temp_grid[ij] * fields.div_grid[ij]
                + kappa
                    * fields.temp_virt_grid[ij]
                    * (dynamics.uv_grad_lnp[ij] - surface.div_mean_grid[ij]
                        + dynamics.vert_adv_lnp[ij]);
        }

        transform.forward(&tendencies.temp_tend_grid, &mut tendencies.temp_tend);
        flux_divergence(
            transform,
            grid,
            dynamics,
            &fields.temp_grid,
            &fields.u_grid,
            &fields.v_grid,
            &mut tendencies.temp_tend,
        );
    }
}

/// Humidity tendency, wet cores only: ∂q/∂t += q·D − ∇·((u,v)·q).
pub fn humidity_tendency(
    diagn: &mut DiagnosticVariables,
    grid: &RingGrid,
    transform: &mut SpectralTransform,
) {
    for layer in diagn.layers.iter_mut() {
        let DiagnosticLayer {
            grid: fields,
            dynamics,
            tendencies,
        } = layer;

        for ij in 0..fields.humid_grid.len() {
            tendencies.humid_tend_grid[ij] += fields.humid_grid[ij] * fields.div_grid[ij];
        }

        transform.forward(&tendencies.humid_tend_grid, &mut tendencies.humid_tend);
        flux_divergence(
            transform,
            grid,
            dynamics,
            &fields.humid_grid,
            &fields.u_grid,
            &fields.v_grid,
            &mut tendencies.humid_tend,
        );
    }
}

/// Bernoulli potential B = ½(u² + v²) + Φ; its Laplacian is subtracted from
/// the divergence tendency. The geopotential must be up to date.
pub fn bernoulli_potential(
    diagn: &mut DiagnosticVariables,
    grid: &RingGrid,
    transform: &mut SpectralTransform,
) {
    for layer in diagn.layers.iter_mut() {
        let DiagnosticLayer {
            grid: fields,
            dynamics,
            tendencies,
        } = layer;

        for ring in grid.rings() {
            let r2 = ring.coslat_recip2;
            for ij in ring.range {
                dynamics.bernoulli_grid[ij] = 0.5
                    * (fields.u_grid[ij] * fields.u_grid[ij]
                        + fields.v_grid[ij] * fields.v_grid[ij])
                    * r2;
            }
        }

        transform.forward(&dynamics.bernoulli_grid, &mut dynamics.bernoulli);
        dynamics.bernoulli.axpy(1.0, &dynamics.geopot);
        transform.laplacian(&dynamics.bernoulli, &mut tendencies.div_tend, true, true);
    }
}

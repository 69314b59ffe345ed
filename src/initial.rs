//! Reference initial conditions.
//!
//! All generators fill both leapfrog slices so the first (Euler) time step
//! starts from a consistent state.

use crate::grid::RingGrid;
use crate::model::Model;
use crate::spectral::SpectralTransform;
use crate::state::PrognosticVariables;
use num_complex::Complex64;

/// Rossby–Haurwitz wave of zonal wavenumber `m` in the vorticity of layer 0.
///
/// From the streamfunction ψ = −a²ω̃ sinφ + a²K cosᵐφ sinφ cos(mλ), the
/// vorticity is
///
/// ```text
/// ζ = 2ω̃ sinφ − (m+1)(m+2)·K·cosᵐφ sinφ cos(mλ)
/// ```
///
/// which is band-limited to the two harmonics (1,0) and (m+1,m). The
/// conventional test uses m = 4, ω̃ = K = 7.848e−6 s⁻¹.
pub fn rossby_haurwitz(
    progn: &mut PrognosticVariables,
    grid: &RingGrid,
    transform: &mut SpectralTransform,
    m: usize,
    omega_amp: f64,
    k_amp: f64,
) {
    let mm = m as f64;
    let mut vor_grid = grid.zeros();
    grid.fill_from_fn(&mut vor_grid, |lon, lat| {
        let (sinlat, coslat) = lat.sin_cos();
        2.0 * omega_amp * sinlat
            - (mm + 1.0) * (mm + 2.0) * k_amp * coslat.powi(m as i32) * sinlat * (mm * lon).cos()
    });
    transform.forward(&vor_grid, &mut progn.layers[0].vor[0]);
    progn.copy_slice(0, 1);
}

/// Balanced solid-body zonal flow u = u₀cosφ with the geostrophic interface
/// displacement η = −(RΩu₀ + u₀²/2)·sin²φ/g, the shallow-water steady state.
pub fn zonal_flow(progn: &mut PrognosticVariables, model: &mut Model, u0: f64) {
    let radius = model.planet.radius;
    let rotation = model.planet.rotation;
    let gravity = model.planet.gravity;
    let grid = &model.grid;

    let mut vor_grid = grid.zeros();
    grid.fill_from_fn(&mut vor_grid, |_, lat| 2.0 * u0 * lat.sin() / radius);
    let mut eta_grid = grid.zeros();
    grid.fill_from_fn(&mut eta_grid, |_, lat| {
        let s = lat.sin();
        -(radius * rotation * u0 + 0.5 * u0 * u0) * s * s / gravity
    });

    model.transform.forward(&vor_grid, &mut progn.layers[0].vor[0]);
    model.transform.forward(&eta_grid, &mut progn.pres[0]);
    progn.layers[0].div[0].fill_zero();
    progn.copy_slice(0, 1);
}

/// Resting isothermal atmosphere: T ≡ t0 everywhere, p_s = p_ref, no wind.
pub fn resting_isothermal(progn: &mut PrognosticVariables, t0: f64) {
    for layer in &mut progn.layers {
        layer.vor[0].fill_zero();
        layer.div[0].fill_zero();
        layer.temp[0].fill_zero();
        layer.temp[0].set(0, 0, Complex64::new(t0, 0.0));
        layer.humid[0].fill_zero();
    }
    progn.pres[0].fill_zero();
    progn.copy_slice(0, 1);
}

/// Resting isothermal atmosphere plus a zonal jet u = u₀·cos^{3/2}η_v·sin²2φ
/// at every level, the wind field of the Jablonowski–Williamson setup.
pub fn zonal_jet(progn: &mut PrognosticVariables, model: &mut Model, u0: f64, t0: f64) {
    resting_isothermal(progn, t0);

    let grid = &model.grid;
    let sigma_full = model.sigma.sigma_full().to_vec();
    let eta0 = 0.252;

    let mut u_scaled = grid.zeros();
    let zero = grid.zeros();
    for (k, &sigma) in sigma_full.iter().enumerate() {
        let eta_v = (sigma - eta0) * std::f64::consts::FRAC_PI_2;
        let amp = u0 * eta_v.cos().powf(1.5);
        // u/cosφ on the grid, the scaling curl expects
        grid.fill_from_fn(&mut u_scaled, |_, lat| {
            let s2 = (2.0 * lat).sin();
            amp * s2 * s2 / lat.cos()
        });
        let transform = &mut model.transform;
        let mut u_spec = transform.zeros_spectral();
        let mut v_spec = transform.zeros_spectral();
        transform.forward(&u_scaled, &mut u_spec);
        transform.forward(&zero, &mut v_spec);
        transform.curl(&u_spec, &v_spec, &mut progn.layers[k].vor[0], false, false);
        progn.layers[k].vor[0].truncate();
    }
    progn.copy_slice(0, 1);
}

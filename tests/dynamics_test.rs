//! Tendency-engine scenarios: Rossby–Haurwitz support, balanced zonal flow,
//! mass conservation, σ-partition averages and vertical boundaries.

use gcm_rs::dynamics::primitive::{vertical_advection, vertical_averages, vertical_velocity};
use gcm_rs::{initial, Model, ModelConfig, Planet};
use num_complex::Complex64;

// =============================================================================
// S2 — barotropic Rossby–Haurwitz wave
// =============================================================================

#[test]
fn test_rossby_haurwitz_tendency_support() {
    let mut model = Model::new(ModelConfig::barotropic(21)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::rossby_haurwitz(
        &mut progn,
        &model.grid,
        &mut model.transform,
        4,
        7.848e-6,
        7.848e-6,
    );

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    // nonlinear interactions of m ∈ {0, 4} reach only m ∈ {0, 4, 8}
    let vor_tend = &diagn.layers[0].tendencies.vor_tend;
    assert!(vor_tend.linf_norm() > 0.0, "tendency must be nontrivial");
    for (l, m) in vor_tend.iter_lm() {
        if m != 0 && m != 4 && m != 8 {
            assert!(
                vor_tend.get(l, m).norm() < 1e-10,
                "mode ({}, {}) outside the analytic support: {}",
                l,
                m,
                vor_tend.get(l, m).norm()
            );
        }
    }
}

// =============================================================================
// S3 — shallow-water balanced zonal flow
// =============================================================================

#[test]
fn test_zonal_flow_is_steady() {
    let mut model = Model::new(ModelConfig::shallow_water(21)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::zonal_flow(&mut progn, &mut model, 20.0);

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    let vor_tend = diagn.layers[0].tendencies.vor_tend.linf_norm();
    let div_tend = diagn.layers[0].tendencies.div_tend.linf_norm();
    let pres_tend = diagn.surface.pres_tend.linf_norm();
    assert!(vor_tend < 1e-8, "vorticity tendency {}", vor_tend);
    assert!(div_tend < 1e-8, "divergence tendency {}", div_tend);
    assert!(pres_tend < 1e-8, "interface tendency {}", pres_tend);
}

// =============================================================================
// S4 / invariant 4 — mass conservation of the surface-pressure tendency
// =============================================================================

#[test]
fn test_pres_tend_mean_is_bit_exact_zero() {
    let mut model = Model::new(ModelConfig::primitive(10, 4)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();

    initial::resting_isothermal(&mut progn, 280.0);
    // well-formed but nontrivial state
    for (k, layer) in progn.layers.iter_mut().enumerate() {
        layer.vor[1].set(3, 2, Complex64::new(1e-5 * (k + 1) as f64, 2e-5));
        layer.div[1].set(2, 1, Complex64::new(-3e-6, 1e-6 * (k + 1) as f64));
        layer.temp[1].set(4, 0, Complex64::new(2.0, 0.0));
    }
    progn.pres[1].set(1, 1, Complex64::new(0.01, -0.02));
    progn.pres[1].set(3, 0, Complex64::new(0.03, 0.0));

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    assert_eq!(
        diagn.surface.pres_tend.get(0, 0),
        Complex64::new(0.0, 0.0),
        "global-mean surface pressure tendency must vanish bit-exactly"
    );
    // and the rest of the pipeline produced something
    assert!(diagn.layers[0].tendencies.div_tend.linf_norm() > 0.0);
}

// =============================================================================
// S5 / invariant 5 — σ-weighted vertical averages
// =============================================================================

#[test]
fn test_vertical_averages_partition() {
    let model = Model::new(ModelConfig::primitive(10, 8)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();

    for (k, dlayer) in diagn.layers.iter_mut().enumerate() {
        let val = (k + 1) as f64;
        dlayer.grid.u_grid.fill(val);
        dlayer.grid.v_grid.fill(-val);
        dlayer.grid.div_grid.fill(val - 4.5);
    }
    for (k, player) in progn.layers.iter_mut().enumerate() {
        player.div[1].set(2, 1, Complex64::new((k + 1) as f64, -(k as f64)));
    }

    vertical_averages(&progn, &mut diagn, &model.sigma, 1);

    for &u in &diagn.surface.u_mean_grid {
        assert!((u - 4.5).abs() < 1e-13);
    }
    for &v in &diagn.surface.v_mean_grid {
        assert!((v + 4.5).abs() < 1e-13);
    }
    for &d in &diagn.surface.div_mean_grid {
        assert!(d.abs() < 1e-13);
    }

    // spectral mean equals the Δσ-weighted sum of the layer coefficients
    let mut expected = Complex64::new(0.0, 0.0);
    for (k, player) in progn.layers.iter().enumerate() {
        expected += model.sigma.dsigma()[k] * player.div[1].get(2, 1);
    }
    assert!((diagn.surface.div_mean.get(2, 1) - expected).norm() < 1e-14);
}

// =============================================================================
// S6 / invariant 9 — vertical velocity and advection boundaries
// =============================================================================

#[test]
fn test_sigma_flux_boundaries() {
    let model = Model::new(ModelConfig::primitive(10, 6)).unwrap();
    let mut diagn = model.zeros_diagnostic();

    // nontrivial divergence profile, zero pressure gradients
    for (k, dlayer) in diagn.layers.iter_mut().enumerate() {
        dlayer.grid.div_grid.fill((k as f64) - 2.5);
    }
    let progn = model.zeros_prognostic();
    vertical_averages(&progn, &mut diagn, &model.sigma, 1);
    vertical_velocity(&mut diagn, &model.sigma, &model.grid);

    // bottom half-level flux is exactly zero
    let bottom = &diagn.layers[5].dynamics.sigma_tend;
    assert!(bottom.iter().all(|&s| s == 0.0));
    let bottom_m = &diagn.layers[5].dynamics.sigma_m;
    assert!(bottom_m.iter().all(|&s| s == 0.0));

    // the recursion telescopes: σ̇ at the last interior half level matches a
    // direct partial sum
    let dsigma = model.sigma.dsigma();
    let mut partial = 0.0;
    let div_mean = diagn.surface.div_mean_grid[0];
    for k in 0..5 {
        partial -= dsigma[k] * (diagn.layers[k].grid.div_grid[0] - div_mean);
    }
    assert!((diagn.layers[4].dynamics.sigma_tend[0] - partial).abs() < 1e-14);

    // and the full column sum returns to zero at the surface
    let mut total = 0.0;
    for k in 0..6 {
        total -= dsigma[k] * (diagn.layers[k].grid.div_grid[0] - div_mean);
    }
    assert!(total.abs() < 1e-13);

    // uniform wind: vertical advection leaves the momentum tendency untouched
    for dlayer in diagn.layers.iter_mut() {
        dlayer.grid.u_grid.fill(7.0);
        dlayer.grid.v_grid.fill(-3.0);
    }
    vertical_averages(&progn, &mut diagn, &model.sigma, 1);
    vertical_velocity(&mut diagn, &model.sigma, &model.grid);
    vertical_advection(&mut diagn, &model.sigma, &model.grid, true);
    for dlayer in &diagn.layers {
        assert!(dlayer.tendencies.u_tend_grid.iter().all(|&t| t == 0.0));
        assert!(dlayer.tendencies.v_tend_grid.iter().all(|&t| t == 0.0));
    }
}

// =============================================================================
// Invariant 7 — barotropic divergence stays zero
// =============================================================================

#[test]
fn test_barotropic_divergence_never_written() {
    let mut model = Model::new(ModelConfig::barotropic(21)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::rossby_haurwitz(
        &mut progn,
        &model.grid,
        &mut model.transform,
        4,
        7.848e-6,
        7.848e-6,
    );

    for step in 0..5 {
        model.tendencies(&progn, &mut diagn, 1, step as f64 * 600.0);
        assert_eq!(diagn.layers[0].tendencies.div_tend.linf_norm(), 0.0);
        assert_eq!(progn.layers[0].div[1].linf_norm(), 0.0);
    }
}

// =============================================================================
// Resting primitive atmosphere is steady
// =============================================================================

#[test]
fn test_resting_atmosphere_is_steady() {
    let mut model = Model::new(ModelConfig::primitive(15, 5)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::resting_isothermal(&mut progn, 288.0);

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    for dlayer in &diagn.layers {
        assert!(dlayer.tendencies.vor_tend.linf_norm() < 1e-10);
        assert!(dlayer.tendencies.div_tend.linf_norm() < 1e-6);
        assert!(dlayer.tendencies.temp_tend.linf_norm() < 1e-10);
    }
    assert!(diagn.surface.pres_tend.linf_norm() < 1e-12);
}

// =============================================================================
// Unit-sphere shallow water: non-dimensional radius
// =============================================================================

#[test]
fn test_unit_sphere_zonal_flow() {
    let config = ModelConfig::shallow_water(15).with_planet(Planet::unit());
    let mut model = Model::new(config).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::zonal_flow(&mut progn, &mut model, 0.1);

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    assert!(diagn.layers[0].tendencies.vor_tend.linf_norm() < 1e-10);
    assert!(diagn.layers[0].tendencies.div_tend.linf_norm() < 1e-8);
    assert!(diagn.surface.pres_tend.linf_norm() < 1e-10);
}

//! Model-level behavior: interface relaxation, humidity handling and mass
//! conservation in shallow water.

use gcm_rs::{initial, InterfaceRelaxation, Model, ModelConfig, Orography};
use num_complex::Complex64;

#[test]
fn test_relaxation_touches_only_two_modes() {
    let relax = InterfaceRelaxation {
        seasonal: false,
        ..Default::default()
    };
    let config = ModelConfig::shallow_water(15).with_relaxation(relax);
    let mut model = Model::new(config).unwrap();
    let progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();

    // resting state: the only interface forcing is the relaxation
    model.tendencies(&progn, &mut diagn, 1, 0.0);

    let pres_tend = &diagn.surface.pres_tend;
    for (l, m) in pres_tend.iter_lm() {
        let touched = m == 0 && (l == 1 || l == 2);
        if !touched {
            assert!(
                pres_tend.get(l, m).norm() < 1e-14,
                "unexpected forcing at ({}, {})",
                l,
                m
            );
        }
    }
    // θ = 0 target for (2,0) is −1.3·A, away from the resting state
    assert!(pres_tend.get(2, 0).norm() > 0.0);
}

#[test]
fn test_shallow_water_mass_conservation() {
    let mut model = Model::new(
        ModelConfig::shallow_water(21).with_orography(Orography::zonal_ridge()),
    )
    .unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();

    // non-zonal, divergent flow over orography
    progn.layers[0].vor[1].set(3, 2, Complex64::new(2e-5, -1e-5));
    progn.layers[0].vor[1].set(1, 0, Complex64::new(1e-5, 0.0));
    progn.layers[0].div[1].set(2, 2, Complex64::new(1e-6, 3e-6));
    progn.pres[1].set(4, 1, Complex64::new(20.0, -10.0));

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    // invariant 6: the global mean of the interface tendency vanishes
    assert_eq!(
        diagn.surface.pres_tend.get(0, 0),
        Complex64::new(0.0, 0.0)
    );
    assert!(diagn.surface.pres_tend.linf_norm() > 0.0);
}

#[test]
fn test_dry_core_leaves_humidity_untouched() {
    let mut model = Model::new(ModelConfig::primitive(10, 3).with_dry_core(true)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::resting_isothermal(&mut progn, 280.0);
    progn.layers[1].vor[1].set(2, 1, Complex64::new(1e-5, 0.0));

    // sentinels the dry core must not overwrite
    diagn.layers[1].tendencies.humid_tend.set(3, 0, Complex64::new(42.0, 0.0));
    diagn.layers[1].tendencies.humid_tend_grid[7] = 42.0;
    diagn.layers[1].grid.humid_grid[3] = 42.0;

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    assert_eq!(
        diagn.layers[1].tendencies.humid_tend.get(3, 0),
        Complex64::new(42.0, 0.0)
    );
    assert_eq!(diagn.layers[1].tendencies.humid_tend_grid[7], 42.0);
    assert_eq!(diagn.layers[1].grid.humid_grid[3], 42.0);
}

#[test]
fn test_wet_core_advects_humidity() {
    let mut model = Model::new(ModelConfig::primitive(10, 3).with_dry_core(false)).unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::resting_isothermal(&mut progn, 280.0);

    // humidity anomaly in a divergent flow
    progn.layers[1].humid[1].set(2, 0, Complex64::new(5e-3, 0.0));
    progn.layers[1].humid[1].set(0, 0, Complex64::new(8e-3, 0.0));
    progn.layers[1].div[1].set(3, 1, Complex64::new(2e-6, -1e-6));

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    assert!(
        diagn.layers[1].tendencies.humid_tend.linf_norm() > 0.0,
        "wet core must produce humidity tendencies"
    );
    // virtual temperature differs from temperature where q > 0
    let tv = diagn.layers[1].grid.temp_virt_grid[0];
    let t = diagn.layers[1].grid.temp_grid[0];
    assert!(tv > t, "Tᵥ = {} must exceed T = {}", tv, t);
}

#[test]
fn test_primitive_with_ridge_runs() {
    let mut model = Model::new(
        ModelConfig::primitive(15, 4).with_orography(Orography::zonal_ridge()),
    )
    .unwrap();
    let mut progn = model.zeros_prognostic();
    let mut diagn = model.zeros_diagnostic();
    initial::zonal_jet(&mut progn, &mut model, 35.0, 288.0);

    model.tendencies(&progn, &mut diagn, 1, 0.0);

    for dlayer in &diagn.layers {
        assert!(dlayer.tendencies.vor_tend.linf_norm().is_finite());
        assert!(dlayer.tendencies.div_tend.linf_norm().is_finite());
        assert!(dlayer.tendencies.temp_tend.linf_norm().is_finite());
    }
    assert_eq!(
        diagn.surface.pres_tend.get(0, 0),
        Complex64::new(0.0, 0.0)
    );
}

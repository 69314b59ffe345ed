//! Leapfrog time stepping with the Robert–Asselin–Williams filter.
//!
//! Each prognostic field carries two time slices, [0] at t−Δt and [1] at t.
//! A step forms the leapfrog update X(t+Δt) = X(t−Δt) + 2Δt·∂X/∂t, then
//! applies the filter to suppress the computational mode:
//!
//! ```text
//! d        = ν/2 · (X(t−Δt) − 2X(t) + X(t+Δt))
//! X(t)     ← X(t) + α·d          (becomes the new t−Δt slice)
//! X(t+Δt)  ← X(t+Δt) + (α−1)·d   (becomes the new t slice)
//! ```
//!
//! α = 1 recovers the classic Robert–Asselin filter; α ≈ 0.53 (Williams)
//! restores second-order accuracy. The very first step is an Euler forward
//! step from identical slices.

use crate::spectral::SpectralCoeffs;
use crate::state::{DiagnosticVariables, PrognosticVariables};

/// Leapfrog integrator state.
#[derive(Clone, Debug)]
pub struct Leapfrog {
    /// Time step Δt (seconds).
    pub dt: f64,
    /// Robert–Asselin filter coefficient ν.
    pub robert_filter: f64,
    /// Williams correction factor α.
    pub williams_filter: f64,
    step_count: usize,
}

impl Leapfrog {
    /// Integrator with the conventional filter parameters ν = 0.05, α = 0.53.
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            robert_filter: 0.05,
            williams_filter: 0.53,
            step_count: 0,
        }
    }

    /// Number of completed steps.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Advance every prognostic field by one step from the tendencies in the
    /// diagnostic state.
    pub fn step(&mut self, progn: &mut PrognosticVariables, diagn: &DiagnosticVariables) {
        assert_eq!(progn.nlev(), diagn.nlev(), "prognostic/diagnostic nlev mismatch");
        let first = self.step_count == 0;

        for (player, dlayer) in progn.layers.iter_mut().zip(diagn.layers.iter()) {
            self.step_field(&mut player.vor, &dlayer.tendencies.vor_tend, first);
            self.step_field(&mut player.div, &dlayer.tendencies.div_tend, first);
            self.step_field(&mut player.temp, &dlayer.tendencies.temp_tend, first);
            self.step_field(&mut player.humid, &dlayer.tendencies.humid_tend, first);
        }
        self.step_field(&mut progn.pres, &diagn.surface.pres_tend, first);

        self.step_count += 1;
    }

    fn step_field(&self, field: &mut [SpectralCoeffs; 2], tend: &SpectralCoeffs, first: bool) {
        let (old_slice, cur_slice) = field.split_at_mut(1);
        let old = &mut old_slice[0];
        let cur = &mut cur_slice[0];

        if first {
            // Euler forward from identical slices; the old slice keeps t = 0
            cur.axpy(self.dt, tend);
            return;
        }

        let two_dt = 2.0 * self.dt;
        let nu_half = 0.5 * self.robert_filter;
        let alpha = self.williams_filter;

        for ((o, c), &t) in old
            .data_mut()
            .iter_mut()
            .zip(cur.data_mut().iter_mut())
            .zip(tend.data().iter())
        {
            let new = *o + two_dt * t;
            let d = nu_half * (*o - 2.0 * *c + new);
            *o = *c + alpha * d;
            *c = new + (alpha - 1.0) * d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    /// Integrate dX/dt = iωX, a rotation in the complex plane, and check the
    /// amplitude stays near 1 and the phase advances at rate ω.
    #[test]
    fn test_leapfrog_oscillation() {
        let omega = 1.0e-4;
        let dt = 100.0;
        let n_steps = 500;

        let mut progn = PrognosticVariables::zeros(3, 1);
        let mut diagn = DiagnosticVariables::zeros(3, 1, 4);
        progn.layers[0].vor[0].set(1, 0, Complex64::new(1.0, 0.0));
        progn.layers[0].vor[1].set(1, 0, Complex64::new(1.0, 0.0));

        let mut leapfrog = Leapfrog::new(dt);
        for _ in 0..n_steps {
            let x = progn.layers[0].vor[1].get(1, 0);
            diagn.layers[0]
                .tendencies
                .vor_tend
                .set(1, 0, Complex64::new(0.0, omega) * x);
            leapfrog.step(&mut progn, &diagn);
        }

        let x = progn.layers[0].vor[1].get(1, 0);
        let expected_phase = omega * dt * n_steps as f64;
        assert!((x.norm() - 1.0).abs() < 0.01, "amplitude {}", x.norm());
        let phase_err = (x.arg() - expected_phase).rem_euclid(2.0 * std::f64::consts::PI);
        let phase_err = phase_err.min(2.0 * std::f64::consts::PI - phase_err);
        assert!(phase_err < 0.05, "phase error {}", phase_err);
    }

    #[test]
    fn test_first_step_is_euler() {
        let dt = 10.0;
        let mut progn = PrognosticVariables::zeros(3, 1);
        let mut diagn = DiagnosticVariables::zeros(3, 1, 4);
        progn.layers[0].vor[0].set(2, 1, Complex64::new(1.0, 0.0));
        progn.layers[0].vor[1].set(2, 1, Complex64::new(1.0, 0.0));
        diagn.layers[0]
            .tendencies
            .vor_tend
            .set(2, 1, Complex64::new(0.5, 0.0));

        let mut leapfrog = Leapfrog::new(dt);
        leapfrog.step(&mut progn, &diagn);

        // old slice untouched, current advanced by dt·tend
        assert_eq!(progn.layers[0].vor[0].get(2, 1), Complex64::new(1.0, 0.0));
        assert_eq!(progn.layers[0].vor[1].get(2, 1), Complex64::new(6.0, 0.0));
    }

    #[test]
    fn test_filter_damps_computational_mode() {
        // A pure 2Δt oscillation between the slices is the computational
        // mode; with zero tendency the filter must shrink it.
        let mut progn = PrognosticVariables::zeros(3, 1);
        let diagn = DiagnosticVariables::zeros(3, 1, 4);
        progn.layers[0].vor[0].set(1, 0, Complex64::new(1.0, 0.0));
        progn.layers[0].vor[1].set(1, 0, Complex64::new(-1.0, 0.0));

        let mut leapfrog = Leapfrog::new(100.0);
        leapfrog.step(&mut progn, &diagn); // first step: Euler, no filter
        let before = amplitude(&progn);
        for _ in 0..50 {
            leapfrog.step(&mut progn, &diagn);
        }
        let after = amplitude(&progn);
        assert!(after < 0.5 * before, "{} vs {}", after, before);
    }

    fn amplitude(progn: &PrognosticVariables) -> f64 {
        (progn.layers[0].vor[0].get(1, 0) - progn.layers[0].vor[1].get(1, 0)).norm()
    }
}

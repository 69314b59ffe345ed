//! Horizontal hyperdiffusion ∇²ⁿ, applied implicitly to spectral tendencies.
//!
//! The damping rate per degree is normalized so the highest resolved degree
//! decays on the configured time scale:
//!
//! ```text
//! damp(l) = (l(l+1) / L(L+1))ⁿ / τ
//! ```
//!
//! Applied tendency-side before the leapfrog commit, implicitly in the new
//! time level:
//!
//! ```text
//! ∂X/∂t ← (∂X/∂t − damp(l)·X(t−Δt)) / (1 + 2Δt·damp(l))
//! ```

use crate::spectral::SpectralCoeffs;

/// Precomputed per-degree hyperdiffusion factors.
#[derive(Clone, Debug)]
pub struct HorizontalDiffusion {
    /// Explicit damping rate per degree (1/s).
    expl: Vec<f64>,
    /// Implicit denominator 1/(1 + 2Δt·damp) per degree.
    impl_: Vec<f64>,
}

impl HorizontalDiffusion {
    /// Build factors for truncation `trunc`, ∇^(2·power) diffusion with
    /// e-folding time `time_scale` (seconds) at l = L, and time step `dt`.
    pub fn new(trunc: usize, power: usize, time_scale: f64, dt: f64) -> Self {
        let largest = (trunc * (trunc + 1)) as f64;
        let nrows = trunc + 2;
        let mut expl = vec![0.0; nrows];
        let mut impl_ = vec![0.0; nrows];
        for l in 0..nrows {
            let norm = (l * (l + 1)) as f64 / largest;
            let damp = norm.powi(power as i32) / time_scale;
            expl[l] = damp;
            impl_[l] = 1.0 / (1.0 + 2.0 * dt * damp);
        }
        Self { expl, impl_ }
    }

    /// Damp a tendency against the t−Δt slice of its variable.
    pub fn apply(&self, tend: &mut SpectralCoeffs, var_old: &SpectralCoeffs) {
        tend.check_same_shape(var_old);
        let nrows = tend.nrows();
        for m in 0..tend.ncols() {
            let old_col = var_old.column(m);
            let col = tend.column_mut(m);
            for l in m..nrows {
                col[l] = (col[l] - self.expl[l] * old_col[l]) * self.impl_[l];
            }
        }
    }
}

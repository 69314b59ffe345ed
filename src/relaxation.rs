//! Shallow-water interface relaxation toward a prescribed seasonal target.
//!
//! Nudges the two lowest zonal modes of the interface displacement toward a
//! target whose declination follows the seasonal cycle, with relaxation time
//! τ. Only the (l=1, m=0) and (l=2, m=0) coefficients of the interface
//! tendency are touched.

use crate::constants::{DAYS_PER_YEAR, SECONDS_PER_DAY};
use crate::spectral::SpectralCoeffs;
use num_complex::Complex64;

/// Seasonal interface relaxation configuration.
#[derive(Clone, Copy, Debug)]
pub struct InterfaceRelaxation {
    /// Whether the target declination follows the seasonal cycle.
    pub seasonal: bool,
    /// Time of the spring equinox (seconds of model time).
    pub equinox: f64,
    /// Latitude of the tropic of Cancer (radians).
    pub tropic_cancer: f64,
    /// Target amplitude (units of the interface displacement).
    pub amplitude: f64,
    /// Relaxation time scale τ (seconds).
    pub time_scale: f64,
}

impl Default for InterfaceRelaxation {
    fn default() -> Self {
        Self {
            seasonal: true,
            equinox: 79.0 * SECONDS_PER_DAY,
            tropic_cancer: 23.5f64.to_radians(),
            amplitude: 300.0,
            time_scale: 16.0 * SECONDS_PER_DAY,
        }
    }
}

impl InterfaceRelaxation {
    /// Target declination θ at model time `time` (seconds).
    ///
    /// The 45/23.5 factor converts the solar declination range into the
    /// Legendre-mode amplitudes the two targets are calibrated for.
    pub fn declination(&self, time: f64) -> f64 {
        if !self.seasonal {
            return 0.0;
        }
        let year_angle = 2.0 * std::f64::consts::PI * (time - self.equinox)
            / (DAYS_PER_YEAR * SECONDS_PER_DAY);
        (45.0 / 23.5) * self.tropic_cancer * year_angle.sin()
    }

    /// Add τ⁻¹·(η_target − η) into the interface tendency at the (1,0) and
    /// (2,0) modes.
    pub fn apply(&self, time: f64, pres: &SpectralCoeffs, pres_tend: &mut SpectralCoeffs) {
        let theta = self.declination(time);

        let eta2 = self.amplitude * 2.0 * theta.sin();
        let eta3 = self.amplitude * (0.2 - 1.5 * theta.cos());

        let tau_inv = 1.0 / self.time_scale;
        pres_tend.add(1, 0, Complex64::new(tau_inv * (eta2 - pres.get(1, 0).re), 0.0));
        pres_tend.add(2, 0, Complex64::new(tau_inv * (eta3 - pres.get(2, 0).re), 0.0));
    }
}

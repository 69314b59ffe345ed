//! Physical constants and planetary defaults.
//!
//! Values follow the conventions of global atmospheric modelling; all SI.

/// Earth's mean radius (m).
pub const EARTH_RADIUS: f64 = 6.371e6;

/// Earth's angular velocity (rad/s).
pub const EARTH_ROTATION: f64 = 7.292e-5;

/// Gravitational acceleration at the surface (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Gas constant of dry air (J/kg/K).
pub const R_DRY: f64 = 287.05;

/// Gas constant of water vapour (J/kg/K).
pub const R_VAPOUR: f64 = 461.5;

/// Heat capacity of dry air at constant pressure (J/kg/K).
pub const CP_DRY: f64 = 1004.64;

/// Reference surface pressure (Pa) for the log-surface-pressure variable.
pub const P_REF: f64 = 1.0e5;

/// Length of the mean tropical year (days), used by seasonal forcing.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Planet parameters entering the dynamical core.
#[derive(Clone, Copy, Debug)]
pub struct Planet {
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Angular velocity (rad/s).
    pub rotation: f64,
    /// Radius (m). Set to 1 for non-dimensional runs.
    pub radius: f64,
}

impl Default for Planet {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            rotation: EARTH_ROTATION,
            radius: EARTH_RADIUS,
        }
    }
}

impl Planet {
    /// Unit-sphere planet for non-dimensional test runs.
    pub fn unit() -> Self {
        Self {
            gravity: 1.0,
            rotation: 1.0,
            radius: 1.0,
        }
    }
}

/// Thermodynamic constants of the model atmosphere.
#[derive(Clone, Copy, Debug)]
pub struct Atmosphere {
    /// Gas constant of dry air (J/kg/K).
    pub r_dry: f64,
    /// Gas constant of water vapour (J/kg/K).
    pub r_vapour: f64,
    /// Heat capacity at constant pressure (J/kg/K).
    pub cp: f64,
    /// κ = R_d/c_p, the Poisson exponent of the thermodynamic equation.
    pub kappa: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            r_dry: R_DRY,
            r_vapour: R_VAPOUR,
            cp: CP_DRY,
            kappa: R_DRY / CP_DRY,
        }
    }
}

impl Atmosphere {
    /// Virtual-temperature moisture factor R_v/R_d − 1.
    #[inline]
    pub fn mu_virt(&self) -> f64 {
        self.r_vapour / self.r_dry - 1.0
    }
}

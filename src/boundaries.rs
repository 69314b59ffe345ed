//! Boundary fields: orography in grid space and the spectral surface
//! geopotential Φ_s = g·h_s.
//!
//! Three variants: flat (zero), an analytic zonal ridge (the
//! Jablonowski–Williamson surface geopotential balancing their baroclinic
//! zonal jet), and data read from a NetCDF file (feature `netcdf`).
//! Initialization writes both representations; tendency evaluations read
//! them only.

use crate::constants::Planet;
use crate::error::ModelError;
use crate::grid::RingGrid;
use crate::spectral::{SpectralCoeffs, SpectralTransform};

/// Spectral damping parameters for ingested orography.
#[derive(Clone, Copy, Debug)]
pub struct SpectralSmoothing {
    /// Exponent of the (l/L) damping profile.
    pub power: f64,
    /// Damping strength at l = L.
    pub strength: f64,
    /// Fraction of the truncation below which modes are untouched.
    pub fraction: f64,
}

impl Default for SpectralSmoothing {
    fn default() -> Self {
        Self {
            power: 2.0,
            strength: 1.0,
            fraction: 0.5,
        }
    }
}

/// Orography variants.
#[derive(Clone, Debug, Default)]
pub enum Orography {
    /// Flat surface, Φ_s = 0.
    #[default]
    Zero,
    /// Jablonowski–Williamson zonal ridge balancing a zonal jet of strength
    /// `u0` (m/s) with jet parameter `eta0`.
    ZonalRidge { u0: f64, eta0: f64 },
    /// Surface height read from a NetCDF variable on the model grid,
    /// multiplied by `scale`, optionally spectrally smoothed.
    #[cfg(feature = "netcdf")]
    File {
        path: std::path::PathBuf,
        /// Variable name holding surface height in meters.
        var: String,
        scale: f64,
        smoothing: Option<SpectralSmoothing>,
    },
}

impl Orography {
    /// Standard Jablonowski–Williamson ridge (u₀ = 35 m/s, η₀ = 0.252).
    pub fn zonal_ridge() -> Self {
        Self::ZonalRidge {
            u0: 35.0,
            eta0: 0.252,
        }
    }
}

/// Grid orography and spectral surface geopotential, fixed after init.
#[derive(Clone, Debug)]
pub struct Boundaries {
    /// Surface height h_s on the grid (m).
    pub orography: Vec<f64>,
    /// Surface geopotential Φ_s = g·h_s, spectral.
    pub geopot_surf: SpectralCoeffs,
}

impl Boundaries {
    /// Initialize both representations for the chosen variant.
    pub fn new(
        kind: &Orography,
        grid: &RingGrid,
        transform: &mut SpectralTransform,
        planet: &Planet,
    ) -> Result<Self, ModelError> {
        let mut orography = grid.zeros();
        let mut geopot_surf = transform.zeros_spectral();

        match kind {
            Orography::Zero => {}
            Orography::ZonalRidge { u0, eta0 } => {
                let eta_vs = (1.0 - eta0) * std::f64::consts::FRAC_PI_2;
                let cos_etavs = eta_vs.cos().powf(1.5);
                let a_omega = planet.radius * planet.rotation;
                grid.fill_from_fn(&mut orography, |_, lat| {
                    let (sinlat, coslat) = lat.sin_cos();
                    let phi_s = u0 * cos_etavs
                        * ((-2.0 * sinlat.powi(6) * (coslat * coslat + 1.0 / 3.0) + 10.0 / 63.0)
                            * u0
                            * cos_etavs
                            + (8.0 / 5.0 * coslat.powi(3) * (sinlat * sinlat + 2.0 / 3.0)
                                - std::f64::consts::FRAC_PI_4)
                                * a_omega);
                    phi_s / planet.gravity
                });
                transform.forward(&orography, &mut geopot_surf);
                geopot_surf.scale(planet.gravity);
            }
            #[cfg(feature = "netcdf")]
            Orography::File {
                path,
                var,
                scale,
                smoothing,
            } => {
                let file = netcdf::open(path)?;
                let variable = file.variable(var).ok_or_else(|| {
                    ModelError::Orography(format!("variable '{}' not found in {:?}", var, path))
                })?;
                let values: Vec<f64> = variable.get_values(..)?;
                if values.len() != grid.n_points() {
                    return Err(ModelError::Orography(format!(
                        "file has {} points, grid has {}",
                        values.len(),
                        grid.n_points()
                    )));
                }
                for (o, v) in orography.iter_mut().zip(values.iter()) {
                    *o = v * scale;
                }
                transform.forward(&orography, &mut geopot_surf);
                geopot_surf.scale(planet.gravity);
                if let Some(s) = smoothing {
                    geopot_surf.smooth(s.strength, s.power, s.fraction);
                    // keep the grid image consistent with the smoothed spectrum
                    let mut smoothed = geopot_surf.clone();
                    smoothed.scale(1.0 / planet.gravity);
                    transform.inverse(&smoothed, &mut orography);
                }
            }
        }

        log::info!(
            "orography: {:?}, max height {:.1} m",
            std::mem::discriminant(kind),
            orography.iter().cloned().fold(0.0, f64::max)
        );

        Ok(Self {
            orography,
            geopot_surf,
        })
    }

    /// Flat boundaries sized to a transform, the common test setup.
    pub fn flat(grid: &RingGrid, transform: &SpectralTransform) -> Self {
        Self {
            orography: grid.zeros(),
            geopot_surf: transform.zeros_spectral(),
        }
    }
}

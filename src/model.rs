//! Model composition: grid, transform, σ levels, constants, boundaries and
//! the tier selected once per simulation.
//!
//! The tier is a tagged variant chosen at construction; the tendency
//! sequence it drives is dispatched once per evaluation with a plain match,
//! never through per-timestep virtual calls.

use crate::boundaries::{Boundaries, Orography};
use crate::constants::{Atmosphere, Planet};
use crate::dynamics::Geopotential;
use crate::error::ModelError;
use crate::grid::{RingGrid, SpectralGrid};
use crate::relaxation::InterfaceRelaxation;
use crate::spectral::SpectralTransform;
use crate::state::{DiagnosticVariables, PrognosticVariables};
use crate::vertical::SigmaLevels;

/// Model tier, in increasing complexity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelTier {
    /// Single layer, vorticity only.
    Barotropic,
    /// Single layer: vorticity, divergence and interface displacement.
    ShallowWater,
    /// Multi-layer hydrostatic σ-coordinate primitive equations.
    PrimitiveEquation,
}

/// Everything needed to build a [`Model`].
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub tier: ModelTier,
    pub spectral_grid: SpectralGrid,
    /// σ layers; forced to 1 for the single-layer tiers.
    pub nlev: usize,
    pub planet: Planet,
    pub atmosphere: Atmosphere,
    pub orography: Orography,
    pub relaxation: Option<InterfaceRelaxation>,
    /// Skip humidity everywhere when true.
    pub dry_core: bool,
    /// Mean shallow-water layer depth H₀ (m).
    pub layer_depth: f64,
    /// Custom σ half levels; equally spaced when `None`.
    pub sigma_half: Option<Vec<f64>>,
}

impl ModelConfig {
    /// Barotropic vorticity model at the given truncation.
    pub fn barotropic(trunc: usize) -> Self {
        Self {
            tier: ModelTier::Barotropic,
            spectral_grid: SpectralGrid::for_truncation(trunc),
            nlev: 1,
            planet: Planet::default(),
            atmosphere: Atmosphere::default(),
            orography: Orography::Zero,
            relaxation: None,
            dry_core: true,
            layer_depth: 8500.0,
            sigma_half: None,
        }
    }

    /// Shallow-water model at the given truncation.
    pub fn shallow_water(trunc: usize) -> Self {
        Self {
            tier: ModelTier::ShallowWater,
            ..Self::barotropic(trunc)
        }
    }

    /// Primitive-equation model at the given truncation and layer count.
    pub fn primitive(trunc: usize, nlev: usize) -> Self {
        Self {
            tier: ModelTier::PrimitiveEquation,
            nlev,
            ..Self::barotropic(trunc)
        }
    }

    /// Replace the grid descriptor.
    pub fn with_grid(mut self, spectral_grid: SpectralGrid) -> Self {
        self.spectral_grid = spectral_grid;
        self
    }

    /// Replace the planet constants.
    pub fn with_planet(mut self, planet: Planet) -> Self {
        self.planet = planet;
        self
    }

    /// Select the orography variant.
    pub fn with_orography(mut self, orography: Orography) -> Self {
        self.orography = orography;
        self
    }

    /// Enable shallow-water interface relaxation.
    pub fn with_relaxation(mut self, relaxation: InterfaceRelaxation) -> Self {
        self.relaxation = Some(relaxation);
        self
    }

    /// Toggle humidity.
    pub fn with_dry_core(mut self, dry_core: bool) -> Self {
        self.dry_core = dry_core;
        self
    }

    /// Set the shallow-water mean layer depth H₀ (m).
    pub fn with_layer_depth(mut self, layer_depth: f64) -> Self {
        self.layer_depth = layer_depth;
        self
    }

    /// Use custom σ half levels.
    pub fn with_sigma_half(mut self, sigma_half: Vec<f64>) -> Self {
        self.sigma_half = Some(sigma_half);
        self
    }
}

/// A fully constructed model: all precomputed tables plus the tier tag.
pub struct Model {
    pub tier: ModelTier,
    pub grid: RingGrid,
    pub transform: SpectralTransform,
    pub sigma: SigmaLevels,
    pub planet: Planet,
    pub atmosphere: Atmosphere,
    pub boundaries: Boundaries,
    pub relaxation: Option<InterfaceRelaxation>,
    pub geopotential: Geopotential,
    pub dry_core: bool,
    pub layer_depth: f64,
}

impl Model {
    /// Validate the configuration and precompute every table.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let nlev = match config.tier {
            ModelTier::Barotropic | ModelTier::ShallowWater => 1,
            ModelTier::PrimitiveEquation => config.nlev,
        };

        let grid = RingGrid::new(&config.spectral_grid, &config.planet)?;
        let mut transform = SpectralTransform::new(
            &grid,
            config.spectral_grid.trunc,
            config.planet.radius,
        )?;
        let sigma = match config.sigma_half {
            Some(half) => SigmaLevels::from_half_levels(half)?,
            None => SigmaLevels::uniform(nlev),
        };
        if sigma.nlev() != nlev {
            return Err(ModelError::SigmaLayerCount {
                expected: nlev,
                got: sigma.nlev(),
            });
        }

        let boundaries =
            Boundaries::new(&config.orography, &grid, &mut transform, &config.planet)?;
        let geopotential =
            Geopotential::new(config.spectral_grid.trunc, &sigma, &config.atmosphere);

        log::info!(
            "model: {:?}, T{}, {} rings, {} layers, dry_core={}",
            config.tier,
            config.spectral_grid.trunc,
            grid.nlat(),
            nlev,
            config.dry_core,
        );

        Ok(Self {
            tier: config.tier,
            grid,
            transform,
            sigma,
            planet: config.planet,
            atmosphere: config.atmosphere,
            boundaries,
            relaxation: config.relaxation,
            geopotential,
            dry_core: config.dry_core,
            layer_depth: config.layer_depth,
        })
    }

    /// Triangular truncation L.
    #[inline]
    pub fn trunc(&self) -> usize {
        self.transform.trunc()
    }

    /// Number of σ layers.
    #[inline]
    pub fn nlev(&self) -> usize {
        self.sigma.nlev()
    }

    /// Allocate a zeroed prognostic state matching this model.
    pub fn zeros_prognostic(&self) -> PrognosticVariables {
        PrognosticVariables::zeros(self.trunc(), self.nlev())
    }

    /// Allocate zeroed diagnostic scratch matching this model.
    pub fn zeros_diagnostic(&self) -> DiagnosticVariables {
        DiagnosticVariables::zeros(self.trunc(), self.nlev(), self.grid.n_points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_layer_tiers_force_nlev() {
        let mut config = ModelConfig::barotropic(10);
        config.nlev = 5;
        let model = Model::new(config).unwrap();
        assert_eq!(model.nlev(), 1);
    }

    #[test]
    fn test_primitive_model_shapes() {
        let model = Model::new(ModelConfig::primitive(10, 4)).unwrap();
        assert_eq!(model.trunc(), 10);
        assert_eq!(model.nlev(), 4);
        let progn = model.zeros_prognostic();
        let diagn = model.zeros_diagnostic();
        assert_eq!(progn.nlev(), 4);
        assert_eq!(diagn.n_points(), model.grid.n_points());
    }

    #[test]
    fn test_invalid_sigma_rejected() {
        let config = ModelConfig::primitive(10, 3).with_sigma_half(vec![0.0, 0.4, 1.0]);
        // 3 layers requested but 2 provided
        assert!(Model::new(config).is_err());
    }
}

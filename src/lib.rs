//! # gcm-rs
//!
//! Spectral-transform dynamical core for a global atmospheric model on the
//! rotating sphere.
//!
//! This crate provides the building blocks of a primitive-equation core and
//! its reduced tiers:
//! - Packed triangular spherical-harmonic coefficients
//! - Gaussian ring grids (full and octahedral)
//! - The bidirectional spectral transform and its differential operators
//!   (gradient, divergence, curl, Laplacian, velocity recovery)
//! - σ-coordinate vertical levels
//! - The tendency engine for the barotropic, shallow-water and
//!   primitive-equation tiers
//! - Orography boundaries and shallow-water interface relaxation
//! - Leapfrog time stepping (Robert–Asselin–Williams filter) and horizontal
//!   hyperdiffusion
//!
//! ## Example
//!
//! ```
//! use gcm_rs::{initial, simulation, Model, ModelConfig, SimulationConfig};
//!
//! let mut model = Model::new(ModelConfig::barotropic(21)).unwrap();
//! let mut progn = model.zeros_prognostic();
//! initial::rossby_haurwitz(&mut progn, &model.grid, &mut model.transform,
//!                          4, 7.848e-6, 7.848e-6);
//!
//! let config = SimulationConfig { dt: 1200.0, n_steps: 4, log_every: 0, ..Default::default() };
//! let result = simulation::run(&mut model, &mut progn, &config);
//! assert_eq!(result.n_steps, 4);
//! ```

pub mod boundaries;
pub mod constants;
pub mod dynamics;
pub mod error;
pub mod grid;
pub mod initial;
pub mod model;
pub mod relaxation;
pub mod simulation;
pub mod spectral;
pub mod state;
pub mod time;
pub mod vertical;

// Re-export main types for convenience
pub use boundaries::{Boundaries, Orography, SpectralSmoothing};
pub use constants::{Atmosphere, Planet};
pub use dynamics::Geopotential;
pub use error::ModelError;
pub use grid::{GridKind, Ring, RingGrid, SpectralGrid};
pub use model::{Model, ModelConfig, ModelTier};
pub use relaxation::InterfaceRelaxation;
pub use simulation::{SimulationConfig, SimulationResult};
pub use spectral::{SpectralCoeffs, SpectralTransform};
pub use state::{DiagnosticVariables, PrognosticVariables};
pub use time::{HorizontalDiffusion, Leapfrog};
pub use vertical::SigmaLevels;

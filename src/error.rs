//! Error types for model construction.
//!
//! Configuration errors are reported before the first tendency evaluation;
//! once a model is built, shape mismatches inside the tendency pipeline are
//! caller errors and are enforced with assertions instead.

use thiserror::Error;

/// Errors raised while building a model or its precomputed tables.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Spectral truncation incompatible with the chosen grid.
    #[error(
        "truncation T{trunc} needs at least {required} latitude rings, grid has {nlat}"
    )]
    TruncationTooHigh {
        trunc: usize,
        nlat: usize,
        required: usize,
    },

    /// σ layer thicknesses must partition the unit interval.
    #[error("sigma layer thicknesses must sum to 1, got {sum}")]
    SigmaPartition { sum: f64 },

    /// σ half levels must run monotonically from 0 (top) to 1 (surface).
    #[error("sigma half levels must increase from 0 to 1")]
    SigmaHalfLevels,

    /// σ partitioning does not match the configured layer count.
    #[error("{got} sigma layers provided, model has {expected}")]
    SigmaLayerCount { expected: usize, got: usize },

    /// Orography file missing or malformed.
    #[error("orography: {0}")]
    Orography(String),

    /// Underlying I/O failure during initialization.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error while reading boundary files.
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),
}

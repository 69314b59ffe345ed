//! Time integration: leapfrog with the Robert–Asselin–Williams filter and
//! the horizontal hyperdiffusion applied to tendencies before committing.

pub mod diffusion;
pub mod leapfrog;

pub use diffusion::HorizontalDiffusion;
pub use leapfrog::Leapfrog;

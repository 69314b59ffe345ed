//! Model state containers: prognostic spectral fields with leapfrog slices
//! and the diagnostic scratch the tendency engine works through.

pub mod diagnostic;
pub mod prognostic;

pub use diagnostic::{
    DiagnosticLayer, DiagnosticVariables, DynamicsVariables, GridVariables, LayerTendencies,
    SurfaceVariables,
};
pub use prognostic::{PrognosticLayer, PrognosticVariables, N_STEPS};

//! Five-period discounted-cash-flow valuation engine.
//!
//! Every public operation is a pure function of its explicit inputs:
//! scenario resolution, cash-flow projection, terminal-value aggregation,
//! CAPM/WACC derivation, and the WACC x growth sensitivity grid. There is
//! no shared state, no I/O, and no caching; results are recomputed
//! wholesale from current inputs on every call.

pub mod capital;
pub mod error;
pub mod projection;
pub mod scenario;
pub mod sensitivity;
pub mod templates;
pub mod types;
pub mod valuation;

pub use error::ModelError;
pub use types::*;

/// Standard result type for all engine operations
pub type ModelResult<T> = Result<T, ModelError>;

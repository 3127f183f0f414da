use thiserror::Error;

/// Errors raised by the valuation engine.
///
/// Every variant is an input-validation failure surfaced to the caller at
/// the point of detection; the engine is pure and synchronous, so there are
/// no resource or transient faults. Invalid inputs are never clamped or
/// defaulted: a silently adjusted discount rate would produce a materially
/// wrong valuation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    /// Negative debt-to-equity ratio: the capital-structure weights no
    /// longer sum to 1.
    #[error("Invalid capital structure: {0}")]
    InvalidCapitalStructure(String),

    /// Discount rate at or below -100%, making compounding undefined.
    #[error("Invalid discount rate: {0}")]
    InvalidDiscountRate(String),

    /// Discount rate at or below the terminal growth rate; the growing
    /// perpetuity does not converge. Raised before the division that would
    /// otherwise produce infinity or a silently negative terminal value.
    #[error("Non-convergent terminal value: {0}")]
    NonConvergentTerminalValue(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::SerializationError(e.to_string())
    }
}

//! Error types for the Valora valuation engine.
//!
//! Every engine returns either a result or an explicit "could not calculate"
//! [`ValoraError`]. Expected edge cases (an undefined
//! perpetuity, degenerate capital structure) are reported through this enum and
//! never through panics.

use thiserror::Error;

/// The main error type for Valora operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValoraError {
    /// An assumption makes the calculation undefined, such as a discount
    /// rate at or below the perpetual growth rate.
    #[error("Invalid assumption: {0}")]
    InvalidAssumption(String),

    /// A root search exhausted its iteration budget without reaching the
    /// tolerance. Only raised when a caller asks for strict convergence.
    #[error("Root search did not converge after {iterations} iterations (residual {residual:e})")]
    NonConvergence {
        /// Iterations performed.
        iterations: usize,
        /// Absolute residual at the last evaluated point.
        residual: f64,
    },

    /// Input data with no sensible valuation (zero shares outstanding, etc.).
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// The caller broke the calling contract (zero horizon, empty sequence).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A saved run already exists under the same key. Saved runs are never
    /// overwritten; delete the old one first.
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// The fundamentals or history service failed.
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl ValoraError {
    /// Whether this error means the valuation is undefined for the given
    /// assumptions, as opposed to a failure of the caller or the network.
    #[must_use]
    pub const fn is_undefined_result(&self) -> bool {
        matches!(self, Self::InvalidAssumption(_) | Self::DegenerateInput(_))
    }
}

impl From<String> for ValoraError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ValoraError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Valora operations.
pub type Result<T> = std::result::Result<T, ValoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValoraError::InvalidAssumption("wacc <= growth".to_string());
        assert_eq!(err.to_string(), "Invalid assumption: wacc <= growth");

        let err = ValoraError::NonConvergence {
            iterations: 100,
            residual: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "Root search did not converge after 100 iterations (residual 5e-1)"
        );
    }

    #[test]
    fn test_undefined_result_classification() {
        assert!(ValoraError::InvalidAssumption(String::new()).is_undefined_result());
        assert!(ValoraError::DegenerateInput(String::new()).is_undefined_result());
        assert!(!ValoraError::UpstreamFetch(String::new()).is_undefined_result());
        assert!(!ValoraError::InvalidInput(String::new()).is_undefined_result());
        assert!(!ValoraError::DuplicateEntry(String::new()).is_undefined_result());
    }

    #[test]
    fn test_error_from_string() {
        let err: ValoraError = "fail".into();
        assert!(matches!(err, ValoraError::Other(_)));
    }
}

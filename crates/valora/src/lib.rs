#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # valora
//!
//! Valuation calculation engine for equity research.
//!
//! valora is an umbrella crate that re-exports all valora sub-crates for
//! convenience. It provides a unified API for turning a company's reported
//! financials and a set of assumptions into an intrinsic value, an implied
//! growth rate, or a multi-phase growth valuation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use valora::prelude::*;
//!
//! # async fn example() -> valora::Result<()> {
//! let client = ValuationApiClient::from_env()?;
//! let snapshot = client.snapshot(ValuationKind::Dcf, "AAPL").await?;
//!
//! let assumptions = DcfAssumptions::from_snapshot(&snapshot);
//! let output = DcfEngine::new().run(&snapshot, &assumptions)?;
//! println!("{}: {:.2} ({})", snapshot.symbol, output.intrinsic_value_per_share, output.verdict);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Data model, assumptions, outputs and the [`ValuationEngine`] trait
//! - [`engine`] - DCF, reverse DCF and growth engines plus their building blocks
//! - [`api`] - HTTP client for fundamentals and valuation history
//!
//! ## Architecture
//!
//! 1. **Snapshots** carry the reported figures for one company at one date
//! 2. **Engines** are pure functions of a snapshot and assumptions
//! 3. **Verdicts** classify intrinsic value against the market price
//! 4. **History stores** persist runs keyed by symbol and date

/// Version information for the valora crate.
///
/// This constant contains the current version of valora as specified in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core types and traits for valora.
///
/// - [`FinancialSnapshot`] - Reported fundamentals for one company
/// - [`ValuationInputs`] / [`ValuationOutput`] - Per-engine assumptions and results
/// - [`ValuationEngine`] - Common engine interface
/// - [`HistoryStore`] - Persistence for past runs
pub mod traits {
    pub use valora_traits::*;
}

// Re-export core traits at top level for convenience
pub use valora_traits::{HistoryStore, Schedule, ValuationEngine};

// Re-export error types
pub use valora_traits::{Result, ValoraError};

// Re-export common types
pub use valora_traits::{
    Date, FinancialSnapshot, Symbol, ValuationInputs, ValuationKind, ValuationOutput, Verdict,
};

// ============================================================================
// Engines
// ============================================================================

/// Valuation engines.
///
/// ## Engines
///
/// - **DcfEngine**: Flat-growth projection, exit-multiple terminal value
/// - **ReverseDcfEngine**: Growth rate implied by the market price
/// - **GrowthEngine**: Growth fade, margin and cost-of-capital convergence
///
/// ## Verdicts
///
/// ```text
/// upside = (intrinsic - price) / price
/// ```
///
/// - upside > +20%: undervalued
/// - upside < -20%: overvalued
/// - otherwise: neutral
///
/// # Example
///
/// ```ignore
/// use valora::engine::{ReverseDcfEngine, registry::available_engines};
///
/// for info in available_engines() {
///     println!("{:<12} {}", info.name, info.description);
/// }
///
/// let out = ReverseDcfEngine::new().run(&snapshot, &assumptions)?;
/// println!("implied growth: {:.2}%", out.implied_growth_rate * 100.0);
/// ```
pub mod engine {
    pub use valora_engine::*;
}

// ============================================================================
// Data Providers
// ============================================================================

/// Valuation service client.
///
/// ## Setup
///
/// Set the `VALORA_API_URL` environment variable or add it to a `.env` file.
///
/// ## Example
///
/// ```ignore
/// use valora::api::ValuationApiClient;
/// use valora::ValuationKind;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ValuationApiClient::from_env()?;
///     let history = client.history(ValuationKind::Growth, "AAPL").await?;
///     println!("{} saved runs", history.len());
///     Ok(())
/// }
/// ```
pub mod api {
    pub use valora_api::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and traits for
/// working with valora. Import it with:
///
/// ```ignore
/// use valora::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{InMemoryHistoryStore, ValuationApiClient};
    pub use crate::engine::{DcfEngine, GrowthEngine, ReverseDcfEngine};
    pub use crate::traits::*;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        // Version should be in semver format (x.y.z)
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_re_exports() {
        fn _accept_dcf(_engine: &dyn ValuationEngine<Assumptions = traits::DcfAssumptions>) {}
        fn _accept_schedule(_schedule: &dyn Schedule) {}

        _accept_dcf(&engine::DcfEngine::new());
        _accept_schedule(&traits::Flat(0.1));
    }

    #[test]
    fn test_error_types() {
        let _result: Result<()> = Ok(());
        let _error: ValoraError = ValoraError::InvalidInput("test".to_string());
    }

    #[test]
    fn test_end_to_end_dcf() {
        use prelude::*;

        let document: api::SnapshotDocument = serde_json::from_str(
            r#"{
                "symbol": "ACME",
                "asOfDate": "2024-06-30",
                "currentSharePrice": 100.0,
                "sharesOutstanding": 10.0,
                "operatingCashFlow": 100.0,
                "capitalExpenditure": -20.0
            }"#,
        )
        .unwrap();
        let snapshot = document.into_snapshot("ACME", Date::from_ymd_opt(2024, 6, 30).unwrap());

        let assumptions = DcfAssumptions {
            discount_rate: DiscountRateInput::Override { wacc: 0.10 },
            growth_rate: 0.10,
            ..DcfAssumptions::from_snapshot(&snapshot)
        };
        let output = DcfEngine::new()
            .evaluate(&snapshot, &assumptions)
            .unwrap();

        assert_eq!(output.kind(), ValuationKind::Dcf);
        assert_eq!(output.verdict(), Verdict::Undervalued);
        assert_relative_eq!(
            output.intrinsic_value_per_share().unwrap(),
            160.0,
            epsilon = 1e-9
        );
    }
}

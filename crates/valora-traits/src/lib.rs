#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the Valora valuation engine.
//!
//! This crate provides the data model shared by every engine (snapshots,
//! assumptions, outputs, history entries), the error type, and the
//! [`ValuationEngine`], [`Schedule`] and [`HistoryStore`] abstractions.

/// The version of the valora-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod assumptions;
pub mod engine;
pub mod error;
pub mod history;
pub mod output;
pub mod schedule;
pub mod types;

// Re-exports
pub use assumptions::{
    DcfAssumptions, DiscountRateInput, GrowthAssumptions, MAX_PROJECTION_YEARS,
    ReverseDcfAssumptions, TerminalConvention, ValuationInputs, check_projection_years,
};
pub use engine::ValuationEngine;
pub use error::{Result, ValoraError};
pub use history::HistoryStore;
pub use output::{
    DcfOutput, GrowthOutput, GrowthYear, ReverseDcfOutput, ValuationHistoryEntry,
    ValuationOutput,
};
pub use schedule::{Flat, FnSchedule, Schedule};
pub use types::{
    BaselineAssumptions, Date, FinancialSnapshot, ProjectedCashFlow, Symbol, ValuationKind,
    Verdict,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}

//! Valuation engine trait.
//!
//! This module defines the `ValuationEngine` trait, the common interface of
//! the forward DCF, reverse DCF and multi-phase growth engines. Engines are
//! pure: they read a snapshot and an assumption set and return an output,
//! with no I/O and no shared state.

use crate::{FinancialSnapshot, Result, ValuationKind, ValuationOutput};

/// A deterministic valuation procedure.
///
/// Implementations must be `Send + Sync` so independent callers can run them
/// concurrently, and must return bit-identical output for identical input.
///
/// # Example
///
/// ```no_run
/// use valora_traits::{
///     FinancialSnapshot, Result, ValuationEngine, ValuationKind, ValuationOutput,
/// };
///
/// struct BookValue;
///
/// impl ValuationEngine for BookValue {
///     type Assumptions = ();
///
///     fn name(&self) -> &str {
///         "book_value"
///     }
///
///     fn kind(&self) -> ValuationKind {
///         ValuationKind::Dcf
///     }
///
///     fn evaluate(&self, snapshot: &FinancialSnapshot, _: &()) -> Result<ValuationOutput> {
///         todo!()
///     }
/// }
/// ```
pub trait ValuationEngine: Send + Sync {
    /// Assumption set the engine consumes.
    type Assumptions;

    /// Returns the name of this engine.
    ///
    /// The name is unique and is used in logs and on the command line.
    fn name(&self) -> &str;

    /// The kind of valuation this engine produces.
    fn kind(&self) -> ValuationKind;

    /// Run the valuation.
    ///
    /// # Errors
    ///
    /// Returns an error when the assumptions make the result undefined (for
    /// example a discount rate at or below the perpetual growth rate), when
    /// the snapshot is degenerate, or when the calling contract is broken.
    fn evaluate(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &Self::Assumptions,
    ) -> Result<ValuationOutput>;
}

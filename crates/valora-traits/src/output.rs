//! Valuation results and persisted history entries.
//!
//! Outputs expose every intermediate step (discount rate, each projected
//! year, terminal value) so a result can be audited line by line.

use serde::{Deserialize, Serialize};

use crate::{
    Result, ValoraError,
    assumptions::ValuationInputs,
    types::{Date, FinancialSnapshot, ProjectedCashFlow, Symbol, ValuationKind, Verdict},
};

/// Result of a forward DCF run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfOutput {
    /// Discount rate used for every year.
    pub wacc: f64,
    /// Projected free cash flows, years 1..N.
    pub projected_cash_flows: Vec<ProjectedCashFlow>,
    /// Undiscounted terminal value at year N.
    pub terminal_value: f64,
    /// Present value of projected flows plus terminal value.
    pub present_value: f64,
    /// Present value less total debt plus cash.
    pub equity_value: f64,
    /// Equity value per share.
    pub intrinsic_value_per_share: f64,
    /// `(intrinsic - price) / price`.
    pub upside: f64,
    /// Verdict against the current share price.
    pub verdict: Verdict,
}

/// Result of a reverse DCF run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseDcfOutput {
    /// Constant growth rate that equates model value and market value.
    pub implied_growth_rate: f64,
    /// Discount rate used.
    pub wacc: f64,
    /// Market cap less cash plus total debt.
    pub target_enterprise_value: f64,
    /// NOPAT-based starting free cash flow.
    pub base_free_cash_flow: f64,
    /// Bisection iterations performed.
    pub iterations: usize,
    /// Whether the residual reached the tolerance.
    pub converged: bool,
    /// `PV(implied) - target` at the returned growth rate.
    pub residual: f64,
    /// Per-share fair value at the expected growth rate.
    pub fair_value_at_expected_growth: f64,
    /// Verdict of the expected-growth fair value against the share price.
    pub verdict: Verdict,
}

impl ReverseDcfOutput {
    /// Return the implied growth rate only if the search converged.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::NonConvergence`] when the iteration budget ran
    /// out before the tolerance was reached.
    pub fn require_converged(&self) -> Result<f64> {
        if self.converged {
            Ok(self.implied_growth_rate)
        } else {
            Err(ValoraError::NonConvergence {
                iterations: self.iterations,
                residual: self.residual.abs(),
            })
        }
    }
}

/// One year of the multi-phase growth model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthYear {
    /// Projection year, starting at 1.
    pub year: u32,
    /// Revenue growth applied this year.
    pub growth_rate: f64,
    /// Revenue after growth.
    pub revenue: f64,
    /// Operating margin this year.
    pub operating_margin: f64,
    /// Revenue times margin.
    pub operating_income: f64,
    /// Revenue times reinvestment rate.
    pub reinvestment: f64,
    /// After-tax operating income less reinvestment.
    pub free_cash_flow: f64,
    /// Discount rate for this year.
    pub cost_of_capital: f64,
    /// Discounted free cash flow.
    pub present_value: f64,
}

/// Result of a multi-phase growth run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthOutput {
    /// Terminal (converged) cost of capital.
    pub wacc: f64,
    /// Per-year schedule rows.
    pub years: Vec<GrowthYear>,
    /// Projected free cash flows, years 1..N.
    pub projected_cash_flows: Vec<ProjectedCashFlow>,
    /// Undiscounted terminal value at year N.
    pub terminal_value: f64,
    /// Value of operating assets if the business survives.
    pub going_concern_value: f64,
    /// Probability-weighted blend of going concern and distress proceeds.
    pub equity_value: f64,
    /// Blended value less debt plus cash, per share.
    pub intrinsic_value_per_share: f64,
    /// `(intrinsic - price) / price`.
    pub upside: f64,
    /// Verdict against the current share price.
    pub verdict: Verdict,
}

/// Output of any engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValuationOutput {
    /// Forward DCF result.
    Dcf(DcfOutput),
    /// Reverse DCF result.
    ReverseDcf(ReverseDcfOutput),
    /// Multi-phase growth result.
    Growth(GrowthOutput),
}

impl ValuationOutput {
    /// The engine that produced this output.
    #[must_use]
    pub const fn kind(&self) -> ValuationKind {
        match self {
            Self::Dcf(_) => ValuationKind::Dcf,
            Self::ReverseDcf(_) => ValuationKind::ReverseDcf,
            Self::Growth(_) => ValuationKind::Growth,
        }
    }

    /// The verdict regardless of engine.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        match self {
            Self::Dcf(o) => o.verdict,
            Self::ReverseDcf(o) => o.verdict,
            Self::Growth(o) => o.verdict,
        }
    }

    /// Intrinsic value per share, where the engine produces one.
    #[must_use]
    pub const fn intrinsic_value_per_share(&self) -> Option<f64> {
        match self {
            Self::Dcf(o) => Some(o.intrinsic_value_per_share),
            Self::Growth(o) => Some(o.intrinsic_value_per_share),
            Self::ReverseDcf(_) => None,
        }
    }
}

/// A saved valuation run, keyed by `(symbol, valuation_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationHistoryEntry {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Date of the run.
    pub valuation_date: Date,
    /// Fundamentals used.
    pub snapshot: FinancialSnapshot,
    /// Assumptions used.
    pub assumptions: ValuationInputs,
    /// Result produced.
    pub output: ValuationOutput,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_comments: Option<String>,
}

impl ValuationHistoryEntry {
    /// Build an entry from a run.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidInput`] if the assumptions and output
    /// come from different engines.
    pub fn new(
        valuation_date: Date,
        snapshot: FinancialSnapshot,
        assumptions: ValuationInputs,
        output: ValuationOutput,
        user_comments: Option<String>,
    ) -> Result<Self> {
        if assumptions.kind() != output.kind() {
            return Err(ValoraError::InvalidInput(format!(
                "assumptions for {} cannot be saved with a {} output",
                assumptions.kind(),
                output.kind()
            )));
        }
        Ok(Self {
            symbol: snapshot.symbol.clone(),
            valuation_date,
            snapshot,
            assumptions,
            output,
            user_comments,
        })
    }

    /// Engine that produced this entry.
    #[must_use]
    pub const fn kind(&self) -> ValuationKind {
        self.output.kind()
    }

    /// Storage key.
    #[must_use]
    pub fn key(&self) -> (Symbol, Date) {
        (self.symbol.clone(), self.valuation_date)
    }
}

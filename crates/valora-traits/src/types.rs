//! Common types used throughout the Valora engine.
//!
//! This module defines the company fundamentals a valuation reads
//! ([`FinancialSnapshot`]), the per-year projection rows it produces
//! ([`ProjectedCashFlow`]) and the shared result labels ([`Verdict`],
//! [`ValuationKind`]).

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Result, ValoraError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A ticker symbol such as "AAPL".
pub type Symbol = String;

/// Which engine produced a valuation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValuationKind {
    /// Forward discounted cash flow.
    #[display("dcf")]
    Dcf,
    /// Growth rate implied by the market price.
    #[display("reverse-dcf")]
    ReverseDcf,
    /// Multi-phase growth, margin and risk convergence model.
    #[display("growth")]
    Growth,
}

impl ValuationKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Dcf, Self::ReverseDcf, Self::Growth];

    /// Path segment used by the valuation API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dcf => "dcf",
            Self::ReverseDcf => "reverse-dcf",
            Self::Growth => "growth",
        }
    }
}

impl std::str::FromStr for ValuationKind {
    type Err = ValoraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dcf" => Ok(Self::Dcf),
            "reverse-dcf" | "reverse_dcf" | "reverse" => Ok(Self::ReverseDcf),
            "growth" | "multi-phase" => Ok(Self::Growth),
            other => Err(ValoraError::InvalidInput(format!(
                "unknown valuation kind '{other}'"
            ))),
        }
    }
}

/// Three-way classification of intrinsic value against the market price.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Intrinsic value more than 20% above the market price.
    #[display("Undervalued")]
    Undervalued,
    /// Within 20% of the market price.
    #[display("Neutral")]
    Neutral,
    /// Intrinsic value more than 20% below the market price.
    #[display("Overvalued")]
    Overvalued,
}

/// Baseline assumptions delivered alongside the reported fundamentals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaselineAssumptions {
    /// Equity beta.
    pub beta: f64,
    /// Risk-free rate as a decimal.
    pub risk_free_rate: f64,
    /// Equity market risk premium as a decimal.
    pub market_risk_premium: f64,
    /// Effective tax rate as a decimal.
    pub effective_tax_rate: f64,
    /// Historical average revenue/FCF growth.
    pub historical_growth_rate: f64,
    /// Historical average operating margin.
    pub historical_operating_margin: f64,
}

/// Immutable per-company fundamentals for one valuation session.
///
/// All monetary figures share [`currency`](Self::currency). Capital
/// expenditure may be reported with either sign; engines always use its
/// absolute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Date the figures were taken.
    pub as_of_date: Date,
    /// Last traded share price.
    pub current_share_price: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
    /// ISO currency code shared by every monetary field.
    pub currency: String,

    /// Total revenue.
    pub revenue: f64,
    /// Earnings before interest and taxes.
    pub ebit: f64,
    /// Interest expense.
    pub interest_expense: f64,
    /// Income tax expense.
    pub income_tax_expense: f64,

    /// Cash and cash equivalents.
    pub cash_and_equivalents: f64,
    /// Short-term debt.
    pub short_term_debt: f64,
    /// Long-term debt.
    pub long_term_debt: f64,
    /// Total current assets.
    pub total_current_assets: f64,
    /// Total current liabilities.
    pub total_current_liabilities: f64,

    /// Operating cash flow.
    pub operating_cash_flow: f64,
    /// Capital expenditure (usually reported negative).
    pub capital_expenditure: f64,
    /// Depreciation and amortization.
    pub depreciation_and_amortization: f64,
    /// Stock-based compensation.
    pub stock_based_compensation: f64,

    /// Baseline valuation assumptions.
    pub assumptions: BaselineAssumptions,
}

impl FinancialSnapshot {
    /// Short-term plus long-term debt.
    #[must_use]
    pub fn total_debt(&self) -> f64 {
        self.short_term_debt + self.long_term_debt
    }

    /// Market value of equity at the current price.
    #[must_use]
    pub fn market_cap(&self) -> f64 {
        self.current_share_price * self.shares_outstanding
    }

    /// EBIT over revenue, or zero without revenue.
    #[must_use]
    pub fn current_operating_margin(&self) -> f64 {
        if self.revenue > 0.0 {
            self.ebit / self.revenue
        } else {
            0.0
        }
    }

    /// Current assets less current liabilities.
    #[must_use]
    pub fn net_working_capital(&self) -> f64 {
        self.total_current_assets - self.total_current_liabilities
    }

    /// Reported free cash flow: operating cash flow less capital expenditure.
    #[must_use]
    pub fn free_cash_flow(&self) -> f64 {
        self.operating_cash_flow - self.capital_expenditure.abs()
    }

    /// Check the snapshot can be valued per share.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::DegenerateInput`] when shares outstanding is not
    /// strictly positive or the share price is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.shares_outstanding.is_nan() || self.shares_outstanding <= 0.0 {
            return Err(ValoraError::DegenerateInput(format!(
                "{}: shares outstanding must be positive, got {}",
                self.symbol, self.shares_outstanding
            )));
        }
        if !self.current_share_price.is_finite() {
            return Err(ValoraError::DegenerateInput(format!(
                "{}: share price is not finite",
                self.symbol
            )));
        }
        Ok(())
    }

    /// Convert an equity value into a per-share figure.
    ///
    /// Returns zero when shares outstanding is not positive.
    #[must_use]
    pub fn per_share(&self, equity_value: f64) -> f64 {
        if self.shares_outstanding > 0.0 {
            equity_value / self.shares_outstanding
        } else {
            0.0
        }
    }
}

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedCashFlow {
    /// Projection year, starting at 1.
    pub year: u32,
    /// Projected operating cash flow (zero where the model does not use it).
    pub operating_cash_flow: f64,
    /// Projected capital expenditure as a positive outflow.
    pub capital_expenditure: f64,
    /// Projected free cash flow.
    pub free_cash_flow: f64,
}

impl ProjectedCashFlow {
    /// A row carrying only a free cash flow figure.
    #[must_use]
    pub const fn from_free_cash_flow(year: u32, free_cash_flow: f64) -> Self {
        Self {
            year,
            operating_cash_flow: 0.0,
            capital_expenditure: 0.0,
            free_cash_flow,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            symbol: "ACME".to_string(),
            as_of_date: Date::from_ymd_opt(2024, 6, 30).unwrap(),
            current_share_price: 50.0,
            shares_outstanding: 10.0,
            currency: "USD".to_string(),
            revenue: 1_000.0,
            ebit: 150.0,
            interest_expense: 5.0,
            income_tax_expense: 30.0,
            cash_and_equivalents: 40.0,
            short_term_debt: 20.0,
            long_term_debt: 80.0,
            total_current_assets: 300.0,
            total_current_liabilities: 200.0,
            operating_cash_flow: 100.0,
            capital_expenditure: -20.0,
            depreciation_and_amortization: 25.0,
            stock_based_compensation: 10.0,
            assumptions: BaselineAssumptions {
                beta: 1.2,
                risk_free_rate: 0.04,
                market_risk_premium: 0.05,
                effective_tax_rate: 0.21,
                historical_growth_rate: 0.08,
                historical_operating_margin: 0.15,
            },
        }
    }
}

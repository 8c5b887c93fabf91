//! Weighted average cost of capital.

use serde::{Deserialize, Serialize};
use valora_traits::{DiscountRateInput, FinancialSnapshot};

/// Inputs to the WACC estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaccInputs {
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// Equity beta.
    pub beta: f64,
    /// Equity market risk premium.
    pub market_risk_premium: f64,
    /// Annual interest expense.
    pub interest_expense: f64,
    /// Short-term debt.
    pub short_term_debt: f64,
    /// Long-term debt.
    pub long_term_debt: f64,
    /// Current share price.
    pub current_share_price: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
    /// Effective tax rate.
    pub effective_tax_rate: f64,
}

impl WaccInputs {
    /// Combine CAPM inputs with the snapshot's capital structure.
    #[must_use]
    pub const fn from_snapshot(
        snapshot: &FinancialSnapshot,
        beta: f64,
        risk_free_rate: f64,
        market_risk_premium: f64,
    ) -> Self {
        Self {
            risk_free_rate,
            beta,
            market_risk_premium,
            interest_expense: snapshot.interest_expense,
            short_term_debt: snapshot.short_term_debt,
            long_term_debt: snapshot.long_term_debt,
            current_share_price: snapshot.current_share_price,
            shares_outstanding: snapshot.shares_outstanding,
            effective_tax_rate: snapshot.assumptions.effective_tax_rate,
        }
    }
}

/// Components of a WACC estimate, kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaccBreakdown {
    /// CAPM cost of equity.
    pub cost_of_equity: f64,
    /// Pre-tax cost of debt.
    pub cost_of_debt: f64,
    /// Market value of equity over total capital.
    pub weight_of_equity: f64,
    /// Debt over total capital.
    pub weight_of_debt: f64,
    /// Resulting WACC.
    pub wacc: f64,
}

/// Break a WACC estimate into its components.
///
/// Capital weights use the market value of equity. When total capital is not
/// positive every weight, and the WACC itself, is zero.
#[must_use]
pub fn wacc_breakdown(inputs: &WaccInputs) -> WaccBreakdown {
    let cost_of_equity = inputs.risk_free_rate + inputs.beta * inputs.market_risk_premium;
    let total_debt = inputs.short_term_debt + inputs.long_term_debt;
    let cost_of_debt = if total_debt > 0.0 {
        inputs.interest_expense / total_debt
    } else {
        0.0
    };

    let market_value_of_equity = inputs.current_share_price * inputs.shares_outstanding;
    let total_capital = market_value_of_equity + total_debt;

    if total_capital <= 0.0 || !total_capital.is_finite() {
        return WaccBreakdown {
            cost_of_equity,
            cost_of_debt,
            weight_of_equity: 0.0,
            weight_of_debt: 0.0,
            wacc: 0.0,
        };
    }

    let weight_of_equity = market_value_of_equity / total_capital;
    let weight_of_debt = total_debt / total_capital;
    let wacc = cost_of_equity * weight_of_equity
        + cost_of_debt * weight_of_debt * (1.0 - inputs.effective_tax_rate);

    WaccBreakdown {
        cost_of_equity,
        cost_of_debt,
        weight_of_equity,
        weight_of_debt,
        wacc,
    }
}

/// Estimate the weighted average cost of capital.
///
/// Returns `0.0` for a degenerate capital structure (total capital <= 0).
#[must_use]
pub fn estimate_wacc(inputs: &WaccInputs) -> f64 {
    wacc_breakdown(inputs).wacc
}

/// Resolve a discount rate input against a snapshot.
#[must_use]
pub fn resolve_discount_rate(snapshot: &FinancialSnapshot, input: &DiscountRateInput) -> f64 {
    match *input {
        DiscountRateInput::Capm {
            beta,
            risk_free_rate,
            market_risk_premium,
        } => estimate_wacc(&WaccInputs::from_snapshot(
            snapshot,
            beta,
            risk_free_rate,
            market_risk_premium,
        )),
        DiscountRateInput::Override { wacc } => wacc,
    }
}

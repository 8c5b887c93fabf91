//! User-editable valuation assumptions.
//!
//! Each engine has its own assumption set. All of them can be seeded from the
//! baseline figures of a [`FinancialSnapshot`] and then overridden field by
//! field before a run.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ValoraError},
    types::{FinancialSnapshot, ValuationKind},
};

/// Default explicit projection horizon for the DCF and reverse DCF engines.
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

/// Longest projection horizon any engine accepts.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Default exit multiple applied to the final projected free cash flow.
pub const DEFAULT_TERMINAL_MULTIPLE: f64 = 15.0;

/// Default long-run growth rate for perpetuity terminal values.
pub const DEFAULT_PERPETUAL_GROWTH_RATE: f64 = 0.025;

/// How the discount rate is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DiscountRateInput {
    /// Estimate WACC from CAPM inputs and the snapshot's capital structure.
    Capm {
        /// Equity beta.
        beta: f64,
        /// Risk-free rate.
        risk_free_rate: f64,
        /// Equity market risk premium.
        market_risk_premium: f64,
    },
    /// Use a precomputed WACC.
    Override {
        /// Weighted average cost of capital.
        wacc: f64,
    },
}

impl DiscountRateInput {
    /// CAPM inputs taken from the snapshot's baseline assumptions.
    #[must_use]
    pub const fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        Self::Capm {
            beta: snapshot.assumptions.beta,
            risk_free_rate: snapshot.assumptions.risk_free_rate,
            market_risk_premium: snapshot.assumptions.market_risk_premium,
        }
    }
}

/// Terminal value convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "convention",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum TerminalConvention {
    /// `TV = last FCF * multiple`.
    ExitMultiple {
        /// Multiple applied to the final year's free cash flow.
        multiple: f64,
    },
    /// `TV = last FCF * (1 + g) / (r - g)`.
    PerpetuityGrowth {
        /// Perpetual growth rate `g`.
        growth_rate: f64,
        /// Capitalization rate `r`; the final-year discount rate when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        discount_rate: Option<f64>,
    },
}

impl Default for TerminalConvention {
    fn default() -> Self {
        Self::ExitMultiple {
            multiple: DEFAULT_TERMINAL_MULTIPLE,
        }
    }
}

/// Assumptions for the forward DCF engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfAssumptions {
    /// Discount rate source.
    pub discount_rate: DiscountRateInput,
    /// Flat annual growth applied to operating cash flow and capex.
    pub growth_rate: f64,
    /// Terminal value convention.
    #[serde(default)]
    pub terminal: TerminalConvention,
    /// Subtract stock-based compensation from base operating cash flow.
    #[serde(default)]
    pub exclude_stock_based_compensation: bool,
    /// Explicit projection horizon in years.
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
}

impl DcfAssumptions {
    /// Seed assumptions from the snapshot's baseline figures.
    #[must_use]
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        Self {
            discount_rate: DiscountRateInput::from_snapshot(snapshot),
            growth_rate: snapshot.assumptions.historical_growth_rate,
            terminal: TerminalConvention::default(),
            exclude_stock_based_compensation: false,
            projection_years: DEFAULT_PROJECTION_YEARS,
        }
    }
}

/// Assumptions for the reverse DCF engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseDcfAssumptions {
    /// Discount rate source.
    pub discount_rate: DiscountRateInput,
    /// Growth rate used for the terminal perpetuity.
    pub perpetual_growth_rate: f64,
    /// Explicit projection horizon in years.
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
    /// The analyst's own growth expectation, used to label the result.
    #[serde(default)]
    pub expected_growth_rate: f64,
}

impl ReverseDcfAssumptions {
    /// Seed assumptions from the snapshot's baseline figures.
    #[must_use]
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        Self {
            discount_rate: DiscountRateInput::from_snapshot(snapshot),
            perpetual_growth_rate: DEFAULT_PERPETUAL_GROWTH_RATE,
            projection_years: DEFAULT_PROJECTION_YEARS,
            expected_growth_rate: snapshot.assumptions.historical_growth_rate,
        }
    }
}

/// Assumptions for the multi-phase growth engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthAssumptions {
    /// Revenue growth during the near-term phase.
    pub initial_growth_rate: f64,
    /// Years over which growth fades to the terminal rate.
    pub fade_years: u32,
    /// Long-run revenue growth, also used for the terminal perpetuity.
    pub terminal_growth_rate: f64,
    /// Operating margin the business converges to.
    pub target_operating_margin: f64,
    /// Years to reach the target margin.
    pub years_to_target_margin: u32,
    /// Reinvestment as a fraction of revenue.
    pub reinvestment_rate: f64,
    /// Marginal tax rate on operating income.
    pub marginal_tax_rate: f64,
    /// Cost of capital in year 1.
    pub initial_cost_of_capital: f64,
    /// Mature cost of capital.
    pub terminal_cost_of_capital: f64,
    /// Years for the cost of capital to converge.
    pub years_of_risk_convergence: u32,
    /// Probability the business fails, in `[0, 1]`.
    pub probability_of_failure: f64,
    /// Absolute value recovered in the failure scenario.
    pub distress_proceeds: f64,
    /// Total projection horizon in years.
    pub projection_years: u32,
}

impl GrowthAssumptions {
    /// Seed assumptions from the snapshot's baseline figures.
    ///
    /// The initial cost of capital is the CAPM cost of equity; the terminal
    /// cost of capital assumes a market beta of one.
    #[must_use]
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        let a = &snapshot.assumptions;
        Self {
            initial_growth_rate: a.historical_growth_rate,
            fade_years: 5,
            terminal_growth_rate: DEFAULT_PERPETUAL_GROWTH_RATE,
            target_operating_margin: a.historical_operating_margin,
            years_to_target_margin: 5,
            reinvestment_rate: 0.05,
            marginal_tax_rate: a.effective_tax_rate,
            initial_cost_of_capital: a.risk_free_rate + a.beta * a.market_risk_premium,
            terminal_cost_of_capital: a.risk_free_rate + a.market_risk_premium,
            years_of_risk_convergence: 5,
            probability_of_failure: 0.0,
            distress_proceeds: 0.0,
            projection_years: 10,
        }
    }
}

/// The assumption set recorded with a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValuationInputs {
    /// Forward DCF assumptions.
    Dcf(DcfAssumptions),
    /// Reverse DCF assumptions.
    ReverseDcf(ReverseDcfAssumptions),
    /// Multi-phase growth assumptions.
    Growth(GrowthAssumptions),
}

impl ValuationInputs {
    /// The engine these assumptions belong to.
    #[must_use]
    pub const fn kind(&self) -> ValuationKind {
        match self {
            Self::Dcf(_) => ValuationKind::Dcf,
            Self::ReverseDcf(_) => ValuationKind::ReverseDcf,
            Self::Growth(_) => ValuationKind::Growth,
        }
    }
}

/// Check that a projection horizon lies within `1..=MAX_PROJECTION_YEARS`.
///
/// # Errors
///
/// Returns [`ValoraError::InvalidInput`] otherwise.
pub fn check_projection_years(years: u32) -> Result<()> {
    if years == 0 {
        return Err(ValoraError::InvalidInput(
            "projection horizon must be at least one year".to_string(),
        ));
    }
    if years > MAX_PROJECTION_YEARS {
        return Err(ValoraError::InvalidInput(format!(
            "projection horizon of {years} years exceeds the {MAX_PROJECTION_YEARS}-year limit"
        )));
    }
    Ok(())
}

const fn default_projection_years() -> u32 {
    DEFAULT_PROJECTION_YEARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_dcf_defaults_from_snapshot() {
        let a = DcfAssumptions::from_snapshot(&fixtures::snapshot());
        assert_relative_eq!(a.growth_rate, 0.08);
        assert_eq!(a.projection_years, 5);
        assert!(!a.exclude_stock_based_compensation);
        assert_eq!(a.terminal, TerminalConvention::ExitMultiple { multiple: 15.0 });
        assert!(matches!(a.discount_rate, DiscountRateInput::Capm { beta, .. } if beta == 1.2));
    }

    #[test]
    fn test_growth_defaults_from_snapshot() {
        let a = GrowthAssumptions::from_snapshot(&fixtures::snapshot());
        assert_relative_eq!(a.initial_cost_of_capital, 0.10, epsilon = 1e-12);
        assert_relative_eq!(a.terminal_cost_of_capital, 0.09, epsilon = 1e-12);
        assert_relative_eq!(a.marginal_tax_rate, 0.21);
        assert_relative_eq!(a.target_operating_margin, 0.15);
    }

    #[test]
    fn test_discount_rate_json_shape() {
        let json = serde_json::to_value(DiscountRateInput::Override { wacc: 0.1 }).unwrap();
        assert_eq!(json["method"], "override");
        assert_eq!(json["wacc"], 0.1);

        let parsed: DiscountRateInput = serde_json::from_str(
            r#"{"method":"capm","beta":1.0,"riskFreeRate":0.04,"marketRiskPremium":0.05}"#,
        )
        .unwrap();
        assert!(matches!(parsed, DiscountRateInput::Capm { .. }));
    }

    #[test]
    fn test_dcf_assumptions_fill_defaults() {
        let parsed: DcfAssumptions = serde_json::from_str(
            r#"{"discountRate":{"method":"override","wacc":0.1},"growthRate":0.05}"#,
        )
        .unwrap();
        assert_eq!(parsed.projection_years, DEFAULT_PROJECTION_YEARS);
        assert_eq!(parsed.terminal, TerminalConvention::default());
    }

    #[test]
    fn test_projection_years_bounds() {
        assert!(check_projection_years(1).is_ok());
        assert!(check_projection_years(MAX_PROJECTION_YEARS).is_ok());
        for years in [0, MAX_PROJECTION_YEARS + 1, u32::MAX] {
            assert!(matches!(
                check_projection_years(years),
                Err(ValoraError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_inputs_kind() {
        let s = fixtures::snapshot();
        let inputs = ValuationInputs::Growth(GrowthAssumptions::from_snapshot(&s));
        assert_eq!(inputs.kind(), ValuationKind::Growth);
        let json = serde_json::to_value(&inputs).unwrap();
        assert_eq!(json["kind"], "growth");
    }
}

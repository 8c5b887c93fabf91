//! Forward discounted cash flow engine.
//!
//! Steps:
//! 1. Resolve the discount rate (CAPM-based WACC or an override).
//! 2. Project operating cash flow and capex at a flat growth rate.
//! 3. Discount the projection and an exit-multiple terminal value.
//! 4. Bridge to equity: `PV - total debt + cash`.
//! 5. Divide by shares outstanding and classify against the price.

use tracing::{debug, warn};
use valora_traits::{
    DcfAssumptions, DcfOutput, FinancialSnapshot, Flat, Result, ValuationEngine, ValuationKind,
    ValuationOutput,
};

use crate::{
    discount::discount_cash_flows,
    projection::CashFlowProjector,
    verdict::{get_verdict, upside},
    wacc::resolve_discount_rate,
};

/// Forward DCF engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcfEngine;

impl DcfEngine {
    /// Create a DCF engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run the DCF and return the typed output.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidInput`](valora_traits::ValoraError::InvalidInput)
    /// for a zero projection horizon, and
    /// [`ValoraError::InvalidAssumption`](valora_traits::ValoraError::InvalidAssumption)
    /// when a perpetuity terminal value is requested with a discount rate at or
    /// below its growth rate.
    pub fn run(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &DcfAssumptions,
    ) -> Result<DcfOutput> {
        let wacc = resolve_discount_rate(snapshot, &assumptions.discount_rate);
        self.run_with_rate(snapshot, assumptions, wacc)
    }

    /// Run the DCF at an explicit discount rate.
    pub(crate) fn run_with_rate(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &DcfAssumptions,
        wacc: f64,
    ) -> Result<DcfOutput> {
        let stock_based_compensation = assumptions
            .exclude_stock_based_compensation
            .then_some(snapshot.stock_based_compensation);

        let projector = CashFlowProjector::new(
            snapshot.operating_cash_flow,
            snapshot.capital_expenditure,
            stock_based_compensation,
            Flat(assumptions.growth_rate),
            assumptions.projection_years,
        )?;
        let projected_cash_flows = projector.project();

        let discounted =
            discount_cash_flows(&projected_cash_flows, &Flat(wacc), &assumptions.terminal)?;

        let equity_value =
            discounted.present_value - snapshot.total_debt() + snapshot.cash_and_equivalents;
        if snapshot.shares_outstanding <= 0.0 {
            warn!(symbol = %snapshot.symbol, "no shares outstanding; per-share value set to zero");
        }
        let intrinsic_value_per_share = snapshot.per_share(equity_value);

        debug!(
            symbol = %snapshot.symbol,
            wacc,
            terminal_value = discounted.terminal_value,
            intrinsic_value_per_share,
            "dcf valuation complete"
        );

        Ok(DcfOutput {
            wacc,
            projected_cash_flows,
            terminal_value: discounted.terminal_value,
            present_value: discounted.present_value,
            equity_value,
            intrinsic_value_per_share,
            upside: upside(intrinsic_value_per_share, snapshot.current_share_price),
            verdict: get_verdict(intrinsic_value_per_share, snapshot.current_share_price),
        })
    }
}

impl ValuationEngine for DcfEngine {
    type Assumptions = DcfAssumptions;

    fn name(&self) -> &str {
        "dcf"
    }

    fn kind(&self) -> ValuationKind {
        ValuationKind::Dcf
    }

    fn evaluate(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &DcfAssumptions,
    ) -> Result<ValuationOutput> {
        self.run(snapshot, assumptions).map(ValuationOutput::Dcf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scenario_snapshot, snapshot};
    use approx::assert_relative_eq;
    use valora_traits::{DiscountRateInput, TerminalConvention, ValoraError, Verdict};

    fn scenario_assumptions() -> DcfAssumptions {
        DcfAssumptions {
            discount_rate: DiscountRateInput::Override { wacc: 0.10 },
            growth_rate: 0.10,
            terminal: TerminalConvention::ExitMultiple { multiple: 15.0 },
            exclude_stock_based_compensation: false,
            projection_years: 5,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let out = DcfEngine::new()
            .run(&scenario_snapshot(), &scenario_assumptions())
            .unwrap();

        assert_eq!(out.projected_cash_flows.len(), 5);
        assert_relative_eq!(out.wacc, 0.10);
        assert_relative_eq!(out.projected_cash_flows[4].free_cash_flow, 128.8408, epsilon = 1e-9);
        assert_relative_eq!(out.terminal_value, 1932.612, epsilon = 1e-9);
        // Each year discounts back to 80; the terminal value discounts to 1200.
        assert_relative_eq!(out.present_value, 1600.0, epsilon = 1e-9);
        assert_relative_eq!(out.equity_value, 1600.0, epsilon = 1e-9);
        assert_relative_eq!(out.intrinsic_value_per_share, 160.0, epsilon = 1e-9);
        assert_eq!(out.verdict, Verdict::Undervalued);
    }

    #[test]
    fn test_debt_and_cash_bridge() {
        let s = FinancialSnapshot {
            short_term_debt: 50.0,
            long_term_debt: 150.0,
            cash_and_equivalents: 100.0,
            ..scenario_snapshot()
        };
        let out = DcfEngine::new().run(&s, &scenario_assumptions()).unwrap();
        assert_relative_eq!(out.equity_value, 1500.0, epsilon = 1e-9);
        assert_relative_eq!(out.intrinsic_value_per_share, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stock_compensation_toggle_lowers_value() {
        let s = FinancialSnapshot {
            stock_based_compensation: 10.0,
            ..scenario_snapshot()
        };
        let base = DcfEngine::new().run(&s, &scenario_assumptions()).unwrap();
        let adjusted = DcfEngine::new()
            .run(
                &s,
                &DcfAssumptions {
                    exclude_stock_based_compensation: true,
                    ..scenario_assumptions()
                },
            )
            .unwrap();
        // 70 instead of 80 of base FCF: value scales by 7/8.
        assert_relative_eq!(
            adjusted.intrinsic_value_per_share,
            base.intrinsic_value_per_share * 7.0 / 8.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_idempotent() {
        let s = snapshot();
        let a = DcfAssumptions::from_snapshot(&s);
        let first = DcfEngine::new().run(&s, &a).unwrap();
        let second = DcfEngine::new().run(&s, &a).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.intrinsic_value_per_share.to_bits(),
            second.intrinsic_value_per_share.to_bits()
        );
    }

    #[test]
    fn test_zero_shares_yields_zero_per_share() {
        let s = FinancialSnapshot {
            shares_outstanding: 0.0,
            ..scenario_snapshot()
        };
        let out = DcfEngine::new().run(&s, &scenario_assumptions()).unwrap();
        assert_eq!(out.intrinsic_value_per_share, 0.0);
        assert_eq!(out.verdict, Verdict::Overvalued);
    }

    #[test]
    fn test_perpetuity_terminal_guard() {
        let a = DcfAssumptions {
            terminal: TerminalConvention::PerpetuityGrowth {
                growth_rate: 0.10,
                discount_rate: None,
            },
            ..scenario_assumptions()
        };
        let result = DcfEngine::new().run(&scenario_snapshot(), &a);
        assert!(matches!(result, Err(ValoraError::InvalidAssumption(_))));
    }

    #[test]
    fn test_engine_trait() {
        let engine = DcfEngine::new();
        assert_eq!(engine.name(), "dcf");
        assert_eq!(engine.kind(), ValuationKind::Dcf);
        let out = engine
            .evaluate(&scenario_snapshot(), &scenario_assumptions())
            .unwrap();
        assert_eq!(out.kind(), ValuationKind::Dcf);
    }
}

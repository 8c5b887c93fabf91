//! Reverse DCF engine.
//!
//! Instead of valuing the business forward, the reverse DCF asks which
//! constant growth rate the current market price implies. It solves
//!
//! ```text
//! f(g) = PV(g) - (market cap - cash + total debt) = 0
//! ```
//!
//! by bisection over `g ∈ [-100%, +200%]`, where `PV(g)` compounds a
//! NOPAT-based free cash flow at `g`, discounts at a constant WACC and adds a
//! perpetuity terminal value.

use tracing::debug;
use valora_traits::{
    FinancialSnapshot, Flat, ProjectedCashFlow, Result, ReverseDcfAssumptions, ReverseDcfOutput,
    TerminalConvention, ValoraError, ValuationEngine, ValuationKind, ValuationOutput,
    check_projection_years,
};

use crate::{
    discount::{discount_cash_flows, growth_factor},
    solver::{BisectionSolver, SolverConfig},
    verdict::get_verdict,
    wacc::resolve_discount_rate,
};

/// Lowest growth rate searched.
pub const MIN_IMPLIED_GROWTH: f64 = -1.0;

/// Highest growth rate searched.
pub const MAX_IMPLIED_GROWTH: f64 = 2.0;

/// NOPAT-based free cash flow: `EBIT (1 - t) + D&A - |capex|`.
#[must_use]
pub fn base_free_cash_flow(snapshot: &FinancialSnapshot) -> f64 {
    snapshot.ebit * (1.0 - snapshot.assumptions.effective_tax_rate)
        + snapshot.depreciation_and_amortization
        - snapshot.capital_expenditure.abs()
}

/// Market cap less cash plus total debt.
#[must_use]
pub fn target_enterprise_value(snapshot: &FinancialSnapshot) -> f64 {
    snapshot.market_cap() - snapshot.cash_and_equivalents + snapshot.total_debt()
}

/// Present value of `base_fcf` grown at `growth_rate` for `years`, discounted
/// at `wacc`, with a perpetuity terminal value growing at `perpetual_growth_rate`.
///
/// # Errors
///
/// Returns [`ValoraError::InvalidAssumption`] when `wacc <= perpetual_growth_rate`
/// and [`ValoraError::InvalidInput`] when `years` is zero or above
/// [`MAX_PROJECTION_YEARS`](valora_traits::MAX_PROJECTION_YEARS).
pub fn present_value_at(
    base_fcf: f64,
    growth_rate: f64,
    wacc: f64,
    perpetual_growth_rate: f64,
    years: u32,
) -> Result<f64> {
    check_projection_years(years)?;
    let flows: Vec<ProjectedCashFlow> = (1..=years)
        .map(|year| {
            ProjectedCashFlow::from_free_cash_flow(
                year,
                base_fcf * growth_factor(growth_rate, year),
            )
        })
        .collect();
    let terminal = TerminalConvention::PerpetuityGrowth {
        growth_rate: perpetual_growth_rate,
        discount_rate: None,
    };
    discount_cash_flows(&flows, &Flat(wacc), &terminal).map(|v| v.present_value)
}

/// Reverse DCF engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseDcfEngine {
    solver: BisectionSolver,
}

impl ReverseDcfEngine {
    /// Create an engine using the default bisection settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom solver configuration.
    #[must_use]
    pub const fn with_solver_config(config: SolverConfig) -> Self {
        Self {
            solver: BisectionSolver::new(config),
        }
    }

    /// Solve for the implied growth rate.
    ///
    /// A search that exhausts its iteration budget still returns its best
    /// estimate with `converged == false`.
    ///
    /// # Errors
    ///
    /// - [`ValoraError::InvalidAssumption`] ("cannot calculate") when the
    ///   discount rate does not exceed the perpetual growth rate. This is
    ///   checked before any discounting.
    /// - [`ValoraError::InvalidInput`] when the projection horizon is zero or
    ///   above [`MAX_PROJECTION_YEARS`](valora_traits::MAX_PROJECTION_YEARS).
    pub fn run(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &ReverseDcfAssumptions,
    ) -> Result<ReverseDcfOutput> {
        let wacc = resolve_discount_rate(snapshot, &assumptions.discount_rate);
        let perpetual = assumptions.perpetual_growth_rate;
        let years = assumptions.projection_years;

        if wacc.is_nan() || perpetual.is_nan() || wacc <= perpetual {
            return Err(ValoraError::InvalidAssumption(format!(
                "cannot calculate: discount rate {wacc} must exceed perpetual growth rate {perpetual}"
            )));
        }
        check_projection_years(years)?;

        let base_fcf = base_free_cash_flow(snapshot);
        let target = target_enterprise_value(snapshot);

        let objective = |g: f64| {
            present_value_at(base_fcf, g, wacc, perpetual, years)
                .map_or(f64::NAN, |pv| pv - target)
        };
        let root = self
            .solver
            .find_root(objective, MIN_IMPLIED_GROWTH, MAX_IMPLIED_GROWTH);

        let expected_pv =
            present_value_at(base_fcf, assumptions.expected_growth_rate, wacc, perpetual, years)?;
        let fair_value = snapshot
            .per_share(expected_pv - snapshot.total_debt() + snapshot.cash_and_equivalents);

        debug!(
            symbol = %snapshot.symbol,
            implied_growth_rate = root.root,
            iterations = root.iterations,
            converged = root.converged,
            "reverse dcf solved"
        );

        Ok(ReverseDcfOutput {
            implied_growth_rate: root.root,
            wacc,
            target_enterprise_value: target,
            base_free_cash_flow: base_fcf,
            iterations: root.iterations,
            converged: root.converged,
            residual: root.residual,
            fair_value_at_expected_growth: fair_value,
            verdict: get_verdict(fair_value, snapshot.current_share_price),
        })
    }
}

impl ValuationEngine for ReverseDcfEngine {
    type Assumptions = ReverseDcfAssumptions;

    fn name(&self) -> &str {
        "reverse_dcf"
    }

    fn kind(&self) -> ValuationKind {
        ValuationKind::ReverseDcf
    }

    fn evaluate(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &ReverseDcfAssumptions,
    ) -> Result<ValuationOutput> {
        self.run(snapshot, assumptions)
            .map(ValuationOutput::ReverseDcf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::snapshot;
    use approx::assert_relative_eq;
    use valora_traits::{DiscountRateInput, Verdict};

    fn nopat_snapshot() -> FinancialSnapshot {
        // Base FCF = 100 * 0.8 + 10 - 10 = 80
        let mut s = snapshot();
        s.ebit = 100.0;
        s.assumptions.effective_tax_rate = 0.2;
        s.depreciation_and_amortization = 10.0;
        s.capital_expenditure = -10.0;
        s.cash_and_equivalents = 0.0;
        s.short_term_debt = 0.0;
        s.long_term_debt = 0.0;
        s.shares_outstanding = 10.0;
        s
    }

    fn assumptions(wacc: f64, perpetual: f64) -> ReverseDcfAssumptions {
        ReverseDcfAssumptions {
            discount_rate: DiscountRateInput::Override { wacc },
            perpetual_growth_rate: perpetual,
            projection_years: 5,
            expected_growth_rate: 0.05,
        }
    }

    #[test]
    fn test_base_fcf_and_target() {
        let s = nopat_snapshot();
        assert_relative_eq!(base_free_cash_flow(&s), 80.0, epsilon = 1e-12);
        let s = FinancialSnapshot {
            current_share_price: 20.0,
            cash_and_equivalents: 30.0,
            long_term_debt: 50.0,
            ..s
        };
        assert_relative_eq!(target_enterprise_value(&s), 220.0, epsilon = 1e-12);
    }

    #[test]
    fn test_recovers_known_growth_rate() {
        let pv = present_value_at(80.0, 0.07, 0.10, 0.02, 5).unwrap();
        let s = FinancialSnapshot {
            current_share_price: pv / 10.0,
            ..nopat_snapshot()
        };
        let out = ReverseDcfEngine::new().run(&s, &assumptions(0.10, 0.02)).unwrap();

        assert!(out.converged);
        assert!(out.iterations <= 100);
        assert_relative_eq!(out.implied_growth_rate, 0.07, epsilon = 1e-9);
        let solved = present_value_at(80.0, out.implied_growth_rate, 0.10, 0.02, 5).unwrap();
        assert_relative_eq!(solved, out.target_enterprise_value, max_relative = 1e-6);
    }

    #[test]
    fn test_boundary_cannot_calculate() {
        let result = ReverseDcfEngine::new().run(&nopat_snapshot(), &assumptions(0.08, 0.08));
        assert!(matches!(result, Err(ValoraError::InvalidAssumption(_))));

        let result = ReverseDcfEngine::new().run(&nopat_snapshot(), &assumptions(0.05, 0.08));
        assert!(matches!(result, Err(ValoraError::InvalidAssumption(_))));
    }

    #[test]
    fn test_unreachable_price_reports_non_convergence() {
        // Nothing in [-100%, 200%] justifies this price.
        let s = FinancialSnapshot {
            current_share_price: 1e12,
            ..nopat_snapshot()
        };
        let out = ReverseDcfEngine::new().run(&s, &assumptions(0.10, 0.02)).unwrap();
        assert!(!out.converged);
        assert_eq!(out.iterations, crate::solver::MAX_ITERATIONS);
        assert!(out.implied_growth_rate.is_finite());
        assert!(out.require_converged().is_err());
    }

    #[test]
    fn test_verdict_uses_expected_growth() {
        let pv_at_zero = present_value_at(80.0, 0.0, 0.10, 0.02, 5).unwrap();
        let s = FinancialSnapshot {
            current_share_price: pv_at_zero / 10.0,
            ..nopat_snapshot()
        };
        let mut a = assumptions(0.10, 0.02);
        a.expected_growth_rate = 0.0;
        let out = ReverseDcfEngine::new().run(&s, &a).unwrap();
        assert_eq!(out.verdict, Verdict::Neutral);
        assert_relative_eq!(out.fair_value_at_expected_growth, pv_at_zero / 10.0, max_relative = 1e-12);

        a.expected_growth_rate = 0.5;
        let out = ReverseDcfEngine::new().run(&s, &a).unwrap();
        assert_eq!(out.verdict, Verdict::Undervalued);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let mut a = assumptions(0.10, 0.02);
        a.projection_years = 0;
        let result = ReverseDcfEngine::new().run(&nopat_snapshot(), &a);
        assert!(matches!(result, Err(ValoraError::InvalidInput(_))));
    }

    #[test]
    fn test_oversized_horizon_rejected() {
        let mut a = assumptions(0.10, 0.02);
        a.projection_years = u32::MAX;
        let result = ReverseDcfEngine::new().run(&nopat_snapshot(), &a);
        assert!(matches!(result, Err(ValoraError::InvalidInput(_))));
        assert!(matches!(
            present_value_at(80.0, 0.05, 0.10, 0.02, u32::MAX),
            Err(ValoraError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_engine_trait() {
        let engine = ReverseDcfEngine::new();
        assert_eq!(engine.name(), "reverse_dcf");
        let out = engine
            .evaluate(&nopat_snapshot(), &assumptions(0.10, 0.02))
            .unwrap();
        assert_eq!(out.kind(), ValuationKind::ReverseDcf);
        assert!(out.intrinsic_value_per_share().is_none());
    }
}

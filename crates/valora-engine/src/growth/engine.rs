//! Multi-phase growth engine.

use tracing::{debug, warn};
use valora_traits::{
    FinancialSnapshot, GrowthAssumptions, GrowthOutput, GrowthYear, ProjectedCashFlow, Result,
    Schedule, TerminalConvention, ValoraError, ValuationEngine, ValuationKind, ValuationOutput,
    check_projection_years,
};

use super::schedule::{GrowthFadeSchedule, LinearSchedule};
use crate::{
    discount::discount_cash_flows,
    verdict::{get_verdict, upside},
};

/// Growth, margin and cost-of-capital schedules derived from an assumption set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthSchedules {
    /// Revenue growth by year.
    pub growth: GrowthFadeSchedule,
    /// Operating margin by year.
    pub margin: LinearSchedule,
    /// Cost of capital by year.
    pub cost_of_capital: LinearSchedule,
}

impl GrowthSchedules {
    /// Build the schedules; the margin starts from the snapshot's current
    /// operating margin and year 1 is charged the initial cost of capital.
    #[must_use]
    pub fn new(snapshot: &FinancialSnapshot, assumptions: &GrowthAssumptions) -> Self {
        Self {
            growth: GrowthFadeSchedule::new(
                assumptions.initial_growth_rate,
                assumptions.terminal_growth_rate,
                assumptions.fade_years,
            ),
            margin: LinearSchedule::new(
                snapshot.current_operating_margin(),
                assumptions.target_operating_margin,
                assumptions.years_to_target_margin,
            ),
            cost_of_capital: LinearSchedule::from_year_one(
                assumptions.initial_cost_of_capital,
                assumptions.terminal_cost_of_capital,
                assumptions.years_of_risk_convergence,
            ),
        }
    }
}

/// Multi-phase growth engine.
///
/// Revenue grows along a fade schedule, margins converge to a target, and
/// the discount rate converges from a start-up cost of capital to a mature
/// one. The going-concern value is then blended with distress proceeds:
///
/// ```text
/// value = (1 - p_fail) * going_concern + p_fail * distress_proceeds
/// ```
///
/// The blend is a two-scenario expectation, not a distribution over outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthEngine;

impl GrowthEngine {
    /// Create a growth engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run the model and return the typed output.
    ///
    /// # Errors
    ///
    /// - [`ValoraError::InvalidAssumption`] when the terminal cost of capital
    ///   does not exceed the terminal growth rate, or the failure probability
    ///   is outside `[0, 1]`.
    /// - [`ValoraError::InvalidInput`] when the projection horizon is zero or
    ///   above [`MAX_PROJECTION_YEARS`](valora_traits::MAX_PROJECTION_YEARS).
    pub fn run(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &GrowthAssumptions,
    ) -> Result<GrowthOutput> {
        validate(assumptions)?;

        let schedules = GrowthSchedules::new(snapshot, assumptions);
        let tax_factor = 1.0 - assumptions.marginal_tax_rate;

        let mut revenue = snapshot.revenue;
        let mut years = Vec::new();
        for year in 1..=assumptions.projection_years {
            let growth_rate = schedules.growth.rate(year);
            revenue *= 1.0 + growth_rate;
            let operating_margin = schedules.margin.rate(year);
            let operating_income = revenue * operating_margin;
            let reinvestment = revenue * assumptions.reinvestment_rate;

            years.push(GrowthYear {
                year,
                growth_rate,
                revenue,
                operating_margin,
                operating_income,
                reinvestment,
                free_cash_flow: operating_income * tax_factor - reinvestment,
                cost_of_capital: schedules.cost_of_capital.rate(year),
                present_value: 0.0,
            });
        }

        let projected_cash_flows: Vec<ProjectedCashFlow> = years
            .iter()
            .map(|y| ProjectedCashFlow::from_free_cash_flow(y.year, y.free_cash_flow))
            .collect();

        let terminal = TerminalConvention::PerpetuityGrowth {
            growth_rate: assumptions.terminal_growth_rate,
            discount_rate: Some(assumptions.terminal_cost_of_capital),
        };
        let discounted =
            discount_cash_flows(&projected_cash_flows, &schedules.cost_of_capital, &terminal)?;
        for (row, pv) in years.iter_mut().zip(&discounted.present_values) {
            row.present_value = *pv;
        }

        let going_concern_value = discounted.present_value;
        let p_fail = assumptions.probability_of_failure;
        let equity_value = (1.0 - p_fail) * going_concern_value + p_fail * assumptions.distress_proceeds;

        if snapshot.shares_outstanding <= 0.0 {
            warn!(symbol = %snapshot.symbol, "no shares outstanding; per-share value set to zero");
        }
        let intrinsic_value_per_share = snapshot
            .per_share(equity_value - snapshot.total_debt() + snapshot.cash_and_equivalents);

        debug!(
            symbol = %snapshot.symbol,
            going_concern_value,
            equity_value,
            intrinsic_value_per_share,
            "growth valuation complete"
        );

        Ok(GrowthOutput {
            wacc: assumptions.terminal_cost_of_capital,
            years,
            projected_cash_flows,
            terminal_value: discounted.terminal_value,
            going_concern_value,
            equity_value,
            intrinsic_value_per_share,
            upside: upside(intrinsic_value_per_share, snapshot.current_share_price),
            verdict: get_verdict(intrinsic_value_per_share, snapshot.current_share_price),
        })
    }
}

fn validate(assumptions: &GrowthAssumptions) -> Result<()> {
    check_projection_years(assumptions.projection_years)?;
    let p = assumptions.probability_of_failure;
    if !(0.0..=1.0).contains(&p) {
        return Err(ValoraError::InvalidAssumption(format!(
            "probability of failure must be within [0, 1], got {p}"
        )));
    }
    let (r, g) = (
        assumptions.terminal_cost_of_capital,
        assumptions.terminal_growth_rate,
    );
    if r.is_nan() || g.is_nan() || r <= g {
        return Err(ValoraError::InvalidAssumption(format!(
            "terminal cost of capital {r} must exceed terminal growth rate {g}"
        )));
    }
    Ok(())
}

impl ValuationEngine for GrowthEngine {
    type Assumptions = GrowthAssumptions;

    fn name(&self) -> &str {
        "growth"
    }

    fn kind(&self) -> ValuationKind {
        ValuationKind::Growth
    }

    fn evaluate(
        &self,
        snapshot: &FinancialSnapshot,
        assumptions: &GrowthAssumptions,
    ) -> Result<ValuationOutput> {
        self.run(snapshot, assumptions).map(ValuationOutput::Growth)
    }
}

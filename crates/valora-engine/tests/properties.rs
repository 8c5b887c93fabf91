//! Property tests for the valuation engines.

use chrono::NaiveDate;
use proptest::prelude::*;
use valora_engine::{DcfEngine, ReverseDcfEngine, reverse_dcf::present_value_at};
use valora_traits::{
    BaselineAssumptions, DcfAssumptions, DiscountRateInput, FinancialSnapshot,
    ReverseDcfAssumptions, TerminalConvention, ValoraError,
};

fn unlevered_snapshot(price: f64) -> FinancialSnapshot {
    FinancialSnapshot {
        symbol: "PROP".to_string(),
        as_of_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        current_share_price: price,
        shares_outstanding: 10.0,
        currency: "USD".to_string(),
        revenue: 1_000.0,
        ebit: 100.0,
        interest_expense: 0.0,
        income_tax_expense: 20.0,
        cash_and_equivalents: 0.0,
        short_term_debt: 0.0,
        long_term_debt: 0.0,
        total_current_assets: 0.0,
        total_current_liabilities: 0.0,
        operating_cash_flow: 100.0,
        capital_expenditure: -10.0,
        depreciation_and_amortization: 10.0,
        stock_based_compensation: 0.0,
        assumptions: BaselineAssumptions {
            beta: 1.0,
            risk_free_rate: 0.04,
            market_risk_premium: 0.05,
            effective_tax_rate: 0.2,
            historical_growth_rate: 0.05,
            historical_operating_margin: 0.10,
        },
    }
}

fn dcf_assumptions(growth_rate: f64, wacc: f64) -> DcfAssumptions {
    DcfAssumptions {
        discount_rate: DiscountRateInput::Override { wacc },
        growth_rate,
        terminal: TerminalConvention::ExitMultiple { multiple: 15.0 },
        exclude_stock_based_compensation: false,
        projection_years: 5,
    }
}

fn dcf_value(growth_rate: f64, wacc: f64) -> f64 {
    DcfEngine::new()
        .run(&unlevered_snapshot(100.0), &dcf_assumptions(growth_rate, wacc))
        .unwrap()
        .intrinsic_value_per_share
}

proptest! {
    #[test]
    fn dcf_value_increases_with_growth(
        g in -0.20f64..0.40,
        bump in 0.001f64..0.10,
        wacc in 0.03f64..0.20,
    ) {
        prop_assert!(dcf_value(g + bump, wacc) > dcf_value(g, wacc));
    }

    #[test]
    fn dcf_value_decreases_with_discount_rate(
        g in -0.20f64..0.40,
        wacc in 0.03f64..0.20,
        bump in 0.001f64..0.10,
    ) {
        prop_assert!(dcf_value(g, wacc + bump) < dcf_value(g, wacc));
    }

    #[test]
    fn reverse_dcf_recovers_growth_rate(
        g in -0.10f64..0.40,
        wacc in 0.06f64..0.15,
        perpetual in 0.0f64..0.03,
    ) {
        // Base FCF = 100 * 0.8 + 10 - 10 = 80; no debt or cash, 10 shares.
        let pv = present_value_at(80.0, g, wacc, perpetual, 5).unwrap();
        let snapshot = unlevered_snapshot(pv / 10.0);
        let assumptions = ReverseDcfAssumptions {
            discount_rate: DiscountRateInput::Override { wacc },
            perpetual_growth_rate: perpetual,
            projection_years: 5,
            expected_growth_rate: g,
        };

        let out = ReverseDcfEngine::new().run(&snapshot, &assumptions).unwrap();
        let solved = present_value_at(80.0, out.implied_growth_rate, wacc, perpetual, 5).unwrap();

        prop_assert!(out.converged);
        prop_assert!((solved - pv).abs() <= 1e-6 * pv.abs());
        prop_assert!((out.implied_growth_rate - g).abs() < 1e-6);
    }

    #[test]
    fn reverse_dcf_rejects_rate_at_or_below_perpetual_growth(
        perpetual in 0.0f64..0.10,
        gap in 0.0f64..0.05,
    ) {
        let assumptions = ReverseDcfAssumptions {
            discount_rate: DiscountRateInput::Override { wacc: perpetual - gap },
            perpetual_growth_rate: perpetual,
            projection_years: 5,
            expected_growth_rate: 0.05,
        };
        let result = ReverseDcfEngine::new().run(&unlevered_snapshot(50.0), &assumptions);
        prop_assert!(matches!(result, Err(ValoraError::InvalidAssumption(_))));
    }
}

#[test]
fn reverse_dcf_equal_rates_cannot_calculate() {
    let assumptions = ReverseDcfAssumptions {
        discount_rate: DiscountRateInput::Override { wacc: 0.08 },
        perpetual_growth_rate: 0.08,
        projection_years: 5,
        expected_growth_rate: 0.05,
    };
    let err = ReverseDcfEngine::new()
        .run(&unlevered_snapshot(50.0), &assumptions)
        .unwrap_err();
    assert!(err.to_string().to_lowercase().contains("cannot calculate"));
}

//! Multi-phase growth command implementation.

use crate::{OutputFormat, SaveArgs, SourceArgs, cmd, data, report};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use valora_engine::GrowthEngine;
use valora_traits::{
    GrowthAssumptions, GrowthOutput, ValuationInputs, ValuationKind, ValuationOutput,
};

/// Per-field overrides for growth assumptions.
#[derive(Debug, Default, Args)]
pub(crate) struct GrowthOverrides {
    /// Revenue growth for the first three years
    #[arg(long)]
    pub(crate) initial_growth: Option<f64>,

    /// Years over which growth fades to the terminal rate
    #[arg(long)]
    pub(crate) fade_years: Option<u32>,

    /// Long-run growth rate
    #[arg(long)]
    pub(crate) terminal_growth: Option<f64>,

    /// Target operating margin
    #[arg(long)]
    pub(crate) target_margin: Option<f64>,

    /// Years to reach the target margin
    #[arg(long)]
    pub(crate) margin_years: Option<u32>,

    /// Reinvestment as a fraction of revenue
    #[arg(long)]
    pub(crate) reinvestment_rate: Option<f64>,

    /// Marginal tax rate
    #[arg(long)]
    pub(crate) tax_rate: Option<f64>,

    /// Cost of capital in year one
    #[arg(long)]
    pub(crate) initial_coc: Option<f64>,

    /// Mature cost of capital
    #[arg(long)]
    pub(crate) terminal_coc: Option<f64>,

    /// Years for the cost of capital to converge
    #[arg(long)]
    pub(crate) risk_years: Option<u32>,

    /// Probability of failure in [0, 1]
    #[arg(long)]
    pub(crate) p_fail: Option<f64>,

    /// Value recovered if the business fails
    #[arg(long)]
    pub(crate) distress_proceeds: Option<f64>,

    /// Projection horizon in years
    #[arg(long)]
    pub(crate) years: Option<u32>,
}

impl GrowthOverrides {
    fn apply(&self, a: &mut GrowthAssumptions) {
        let rates = [
            (self.initial_growth, &mut a.initial_growth_rate),
            (self.terminal_growth, &mut a.terminal_growth_rate),
            (self.target_margin, &mut a.target_operating_margin),
            (self.reinvestment_rate, &mut a.reinvestment_rate),
            (self.tax_rate, &mut a.marginal_tax_rate),
            (self.initial_coc, &mut a.initial_cost_of_capital),
            (self.terminal_coc, &mut a.terminal_cost_of_capital),
            (self.p_fail, &mut a.probability_of_failure),
            (self.distress_proceeds, &mut a.distress_proceeds),
        ];
        for (value, field) in rates {
            if let Some(value) = value {
                *field = value;
            }
        }

        let periods = [
            (self.fade_years, &mut a.fade_years),
            (self.margin_years, &mut a.years_to_target_margin),
            (self.risk_years, &mut a.years_of_risk_convergence),
            (self.years, &mut a.projection_years),
        ];
        for (value, field) in periods {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

#[derive(Serialize)]
struct GrowthReport<'a> {
    symbol: &'a str,
    assumptions: &'a GrowthAssumptions,
    output: &'a GrowthOutput,
}

/// Run a multi-phase growth valuation.
pub(crate) async fn run_growth(
    source: &SourceArgs,
    overrides: &GrowthOverrides,
    save: &SaveArgs,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = data::load_snapshot(source, ValuationKind::Growth).await?;
    let mut assumptions = data::load_assumptions(source.assumptions.as_deref(), || {
        GrowthAssumptions::from_snapshot(&snapshot)
    })?;
    overrides.apply(&mut assumptions);

    let output = GrowthEngine::new().run(&snapshot, &assumptions)?;

    match format {
        OutputFormat::Json => report::print_json(&GrowthReport {
            symbol: &snapshot.symbol,
            assumptions: &assumptions,
            output: &output,
        })?,
        OutputFormat::Text => {
            report::header("Multi-Phase Growth");
            report::company(&snapshot);

            report::section("PROJECTION");
            println!(
                "{:<5} {:>8} {:>12} {:>8} {:>12} {:>8} {:>12}",
                "Year", "Growth", "Revenue", "Margin", "FCF", "CoC", "PV"
            );
            println!("{}", "─".repeat(71));
            for y in &output.years {
                println!(
                    "{:<5} {:>8} {:>12.2} {:>8} {:>12.2} {:>8} {:>12.2}",
                    y.year,
                    report::percent(y.growth_rate),
                    y.revenue,
                    report::percent(y.operating_margin),
                    y.free_cash_flow,
                    report::percent(y.cost_of_capital),
                    y.present_value
                );
            }
            println!();

            report::section("VALUATION");
            println!("{:<24} {:>12.2}", "Terminal value", output.terminal_value);
            println!(
                "{:<24} {:>12.2}",
                "Going-concern value", output.going_concern_value
            );
            println!(
                "{:<24} {:>12}",
                "Probability of failure",
                report::percent(assumptions.probability_of_failure)
            );
            println!("{:<24} {:>12.2}", "Equity value", output.equity_value);
            report::verdict_line(
                "Intrinsic value / share",
                output.intrinsic_value_per_share,
                output.upside,
                output.verdict,
            );
            println!();
        }
    }

    cmd::save_run(
        save,
        &snapshot,
        ValuationInputs::Growth(assumptions),
        ValuationOutput::Growth(output),
    )
    .await
}

//! DCF command implementation.

use crate::{OutputFormat, SaveArgs, SourceArgs, cmd, data, report};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use valora_engine::{
    DcfEngine,
    sensitivity::{SensitivityTable, centered_axis, dcf_sensitivity},
};
use valora_traits::{
    DcfAssumptions, DcfOutput, DiscountRateInput, FinancialSnapshot, TerminalConvention,
    ValuationInputs, ValuationKind, ValuationOutput,
};

/// Grid half-width in steps on each axis.
const SENSITIVITY_STEPS: usize = 2;
const GROWTH_STEP: f64 = 0.02;
const RATE_STEP: f64 = 0.01;

/// Per-field overrides for DCF assumptions.
#[derive(Debug, Default, Args)]
pub(crate) struct DcfOverrides {
    /// Annual growth rate (decimal)
    #[arg(long)]
    pub(crate) growth: Option<f64>,

    /// Discount rate override (decimal); CAPM WACC when omitted
    #[arg(long)]
    pub(crate) wacc: Option<f64>,

    /// Terminal exit multiple on final-year free cash flow
    #[arg(long)]
    pub(crate) exit_multiple: Option<f64>,

    /// Use a perpetuity terminal value growing at this rate instead
    #[arg(long, conflicts_with = "exit_multiple")]
    pub(crate) perpetual_growth: Option<f64>,

    /// Projection horizon in years
    #[arg(long)]
    pub(crate) years: Option<u32>,

    /// Subtract stock-based compensation from operating cash flow
    #[arg(long)]
    pub(crate) exclude_sbc: bool,
}

impl DcfOverrides {
    fn apply(&self, assumptions: &mut DcfAssumptions) {
        if let Some(growth) = self.growth {
            assumptions.growth_rate = growth;
        }
        if let Some(wacc) = self.wacc {
            assumptions.discount_rate = DiscountRateInput::Override { wacc };
        }
        if let Some(multiple) = self.exit_multiple {
            assumptions.terminal = TerminalConvention::ExitMultiple { multiple };
        }
        if let Some(growth_rate) = self.perpetual_growth {
            assumptions.terminal = TerminalConvention::PerpetuityGrowth {
                growth_rate,
                discount_rate: None,
            };
        }
        if let Some(years) = self.years {
            assumptions.projection_years = years;
        }
        if self.exclude_sbc {
            assumptions.exclude_stock_based_compensation = true;
        }
    }
}

#[derive(Serialize)]
struct DcfReport<'a> {
    symbol: &'a str,
    assumptions: &'a DcfAssumptions,
    output: &'a DcfOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<&'a SensitivityTable>,
}

/// Run a forward DCF valuation.
pub(crate) async fn run_dcf(
    source: &SourceArgs,
    overrides: &DcfOverrides,
    sensitivity: bool,
    save: &SaveArgs,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = data::load_snapshot(source, ValuationKind::Dcf).await?;
    let mut assumptions = data::load_assumptions(source.assumptions.as_deref(), || {
        DcfAssumptions::from_snapshot(&snapshot)
    })?;
    overrides.apply(&mut assumptions);

    let output = DcfEngine::new().run(&snapshot, &assumptions)?;

    let table = if sensitivity {
        Some(dcf_sensitivity(
            &snapshot,
            &assumptions,
            &centered_axis(assumptions.growth_rate, GROWTH_STEP, SENSITIVITY_STEPS),
            &centered_axis(output.wacc, RATE_STEP, SENSITIVITY_STEPS),
        )?)
    } else {
        None
    };

    match format {
        OutputFormat::Json => report::print_json(&DcfReport {
            symbol: &snapshot.symbol,
            assumptions: &assumptions,
            output: &output,
            sensitivity: table.as_ref(),
        })?,
        OutputFormat::Text => print_text(&snapshot, &assumptions, &output, table.as_ref()),
    }

    cmd::save_run(
        save,
        &snapshot,
        ValuationInputs::Dcf(assumptions),
        ValuationOutput::Dcf(output),
    )
    .await
}

fn print_text(
    snapshot: &FinancialSnapshot,
    assumptions: &DcfAssumptions,
    output: &DcfOutput,
    table: Option<&SensitivityTable>,
) {
    report::header("Discounted Cash Flow");
    report::company(snapshot);

    println!("Discount rate:  {}", report::percent(output.wacc));
    println!("Growth rate:    {}", report::percent(assumptions.growth_rate));
    match assumptions.terminal {
        TerminalConvention::ExitMultiple { multiple } => {
            println!("Terminal:       {multiple:.1}x final-year FCF");
        }
        TerminalConvention::PerpetuityGrowth { growth_rate, .. } => {
            println!("Terminal:       perpetuity at {}", report::percent(growth_rate));
        }
    }
    println!();

    report::section("PROJECTED CASH FLOWS");
    println!(
        "{:<6} {:>14} {:>14} {:>14}",
        "Year", "Op. cash flow", "Capex", "Free CF"
    );
    println!("{}", "─".repeat(51));
    for cf in &output.projected_cash_flows {
        println!(
            "{:<6} {:>14.2} {:>14.2} {:>14.2}",
            cf.year, cf.operating_cash_flow, cf.capital_expenditure, cf.free_cash_flow
        );
    }
    println!();

    report::section("VALUATION");
    println!("{:<24} {:>12.2}", "Terminal value", output.terminal_value);
    println!("{:<24} {:>12.2}", "Present value", output.present_value);
    println!("{:<24} {:>12.2}", "Equity value", output.equity_value);
    report::verdict_line(
        "Intrinsic value / share",
        output.intrinsic_value_per_share,
        output.upside,
        output.verdict,
    );
    println!();

    if let Some(table) = table {
        report::section("SENSITIVITY (value per share)");
        print!("{:>10}", "g \\ r");
        for rate in &table.discount_rates {
            print!(" {:>10}", report::percent(*rate));
        }
        println!();
        for (row, growth) in table.growth_rates.iter().enumerate() {
            print!("{:>10}", report::percent(*growth));
            for col in 0..table.discount_rates.len() {
                match table.get(row, col) {
                    Some(value) => print!(" {value:>10.2}"),
                    None => print!(" {:>10}", "n/a"),
                }
            }
            println!();
        }
        println!();
    }
}

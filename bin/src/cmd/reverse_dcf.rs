//! Reverse DCF command implementation.

use crate::{OutputFormat, SaveArgs, SourceArgs, cmd, data, report};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::warn;
use valora_engine::ReverseDcfEngine;
use valora_traits::{
    DiscountRateInput, ReverseDcfAssumptions, ReverseDcfOutput, ValuationInputs, ValuationKind,
    ValuationOutput,
};

/// Per-field overrides for reverse DCF assumptions.
#[derive(Debug, Default, Args)]
pub(crate) struct ReverseDcfOverrides {
    /// Discount rate override (decimal); CAPM WACC when omitted
    #[arg(long)]
    pub(crate) wacc: Option<f64>,

    /// Perpetual growth rate for the terminal value
    #[arg(long)]
    pub(crate) perpetual_growth: Option<f64>,

    /// Projection horizon in years
    #[arg(long)]
    pub(crate) years: Option<u32>,

    /// Your own growth expectation, used for the verdict
    #[arg(long)]
    pub(crate) expected_growth: Option<f64>,
}

impl ReverseDcfOverrides {
    fn apply(&self, assumptions: &mut ReverseDcfAssumptions) {
        if let Some(wacc) = self.wacc {
            assumptions.discount_rate = DiscountRateInput::Override { wacc };
        }
        if let Some(rate) = self.perpetual_growth {
            assumptions.perpetual_growth_rate = rate;
        }
        if let Some(years) = self.years {
            assumptions.projection_years = years;
        }
        if let Some(rate) = self.expected_growth {
            assumptions.expected_growth_rate = rate;
        }
    }
}

#[derive(Serialize)]
struct ReverseDcfReport<'a> {
    symbol: &'a str,
    assumptions: &'a ReverseDcfAssumptions,
    output: &'a ReverseDcfOutput,
}

/// Solve for the growth rate implied by the market price.
pub(crate) async fn run_reverse_dcf(
    source: &SourceArgs,
    overrides: &ReverseDcfOverrides,
    require_converged: bool,
    save: &SaveArgs,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = data::load_snapshot(source, ValuationKind::ReverseDcf).await?;
    let mut assumptions = data::load_assumptions(source.assumptions.as_deref(), || {
        ReverseDcfAssumptions::from_snapshot(&snapshot)
    })?;
    overrides.apply(&mut assumptions);

    let output = ReverseDcfEngine::new().run(&snapshot, &assumptions)?;
    if require_converged {
        output.require_converged()?;
    } else if !output.converged {
        warn!(
            symbol = %snapshot.symbol,
            residual = output.residual,
            "implied growth is a best estimate; the search did not converge"
        );
    }

    match format {
        OutputFormat::Json => report::print_json(&ReverseDcfReport {
            symbol: &snapshot.symbol,
            assumptions: &assumptions,
            output: &output,
        })?,
        OutputFormat::Text => {
            report::header("Reverse DCF");
            report::company(&snapshot);

            println!("Discount rate:     {}", report::percent(output.wacc));
            println!(
                "Perpetual growth:  {}",
                report::percent(assumptions.perpetual_growth_rate)
            );
            println!("Horizon:           {} years", assumptions.projection_years);
            println!();

            report::section("IMPLIED GROWTH");
            println!("{:<24} {:>12.2}", "Base free cash flow", output.base_free_cash_flow);
            println!(
                "{:<24} {:>12.2}",
                "Target enterprise value", output.target_enterprise_value
            );
            println!(
                "{:<24} {:>12}",
                "Implied growth",
                report::percent(output.implied_growth_rate)
            );
            println!(
                "{:<24} {:>12}",
                "Iterations",
                format!(
                    "{}{}",
                    output.iterations,
                    if output.converged { "" } else { " (no conv.)" }
                )
            );
            println!();

            report::section("AT YOUR EXPECTED GROWTH");
            println!(
                "{:<24} {:>12}",
                "Expected growth",
                report::percent(assumptions.expected_growth_rate)
            );
            report::verdict_line(
                "Fair value / share",
                output.fair_value_at_expected_growth,
                valora_engine::upside(
                    output.fair_value_at_expected_growth,
                    snapshot.current_share_price,
                ),
                output.verdict,
            );
            println!();
        }
    }

    cmd::save_run(
        save,
        &snapshot,
        ValuationInputs::ReverseDcf(assumptions),
        ValuationOutput::ReverseDcf(output),
    )
    .await
}

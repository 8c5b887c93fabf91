//! CLI subcommand modules.
//!
//! This module contains the implementations for all valora CLI subcommands.

pub(crate) mod dcf;
pub(crate) mod engines;
pub(crate) mod growth;
pub(crate) mod history;
pub(crate) mod reverse_dcf;

use crate::{SaveArgs, data};
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;
use valora_api::ValuationApiClient;
use valora_traits::{FinancialSnapshot, ValuationHistoryEntry, ValuationInputs, ValuationOutput};

/// Save a run to the valuation service when `--save` was given.
pub(crate) async fn save_run(
    args: &SaveArgs,
    snapshot: &FinancialSnapshot,
    assumptions: ValuationInputs,
    output: ValuationOutput,
) -> Result<()> {
    if !args.save {
        return Ok(());
    }

    let valuation_date = match &args.date {
        Some(d) => data::parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let kind = output.kind();
    let entry = ValuationHistoryEntry::new(
        valuation_date,
        snapshot.clone(),
        assumptions,
        output,
        args.comment.clone(),
    )?;

    let client = ValuationApiClient::from_env()?;
    client
        .save(kind, &entry)
        .await
        .with_context(|| format!("Failed to save {kind} valuation for {}", entry.symbol))?;
    info!(symbol = %entry.symbol, %valuation_date, %kind, "valuation saved");
    Ok(())
}

//! History command implementation.

use crate::{OutputFormat, data, engines, report};
use anyhow::{Context, Result};
use tracing::info;
use valora_api::ValuationApiClient;

/// List saved runs for a symbol.
pub(crate) async fn list_history(engine: &str, symbol: &str, format: OutputFormat) -> Result<()> {
    let kind = engines::resolve_kind(engine)?;
    let client = ValuationApiClient::from_env()?;
    let entries = client
        .history(kind, symbol)
        .await
        .with_context(|| format!("Failed to fetch {kind} history for {symbol}"))?;

    if format == OutputFormat::Json {
        return report::print_json(&entries);
    }

    report::header("Valuation History");
    println!("Engine: {kind}");
    println!("Symbol: {}", symbol.to_uppercase());
    println!();

    if entries.is_empty() {
        println!("No saved valuations.\n");
        return Ok(());
    }

    println!(
        "{:<12} {:>10} {:>12} {:>12}  {}",
        "Date", "Price", "Value/share", "Verdict", "Comment"
    );
    println!("{}", "─".repeat(62));
    for entry in &entries {
        let value = entry
            .output
            .intrinsic_value_per_share()
            .map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
        println!(
            "{:<12} {:>10.2} {:>12} {:>12}  {}",
            entry.valuation_date,
            entry.snapshot.current_share_price,
            value,
            entry.output.verdict().to_string(),
            entry.user_comments.as_deref().unwrap_or("")
        );
    }
    println!();

    Ok(())
}

/// Delete a saved run. Deleting a run that does not exist succeeds.
pub(crate) async fn delete_history(engine: &str, symbol: &str, date: &str) -> Result<()> {
    let kind = engines::resolve_kind(engine)?;
    let valuation_date = data::parse_date(date)?;
    let client = ValuationApiClient::from_env()?;
    client
        .delete(kind, symbol, valuation_date)
        .await
        .with_context(|| format!("Failed to delete {kind} valuation for {symbol}"))?;

    info!(%symbol, %valuation_date, %kind, "valuation deleted");
    println!("Deleted {kind} valuation for {} on {valuation_date}", symbol.to_uppercase());
    Ok(())
}

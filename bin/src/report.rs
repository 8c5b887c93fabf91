//! Output formatting helpers for the valora CLI.

use anyhow::{Context, Result};
use serde::Serialize;
use valora_traits::{FinancialSnapshot, ValoraError, Verdict};

const BOX_WIDTH: usize = 62;

/// Print a boxed section header.
pub(crate) fn header(title: &str) {
    println!("\n╔{}╗", "═".repeat(BOX_WIDTH));
    println!("║{title:^BOX_WIDTH$}║");
    println!("╚{}╝\n", "═".repeat(BOX_WIDTH));
}

/// Print a ruled subsection title.
pub(crate) fn section(title: &str) {
    println!("{}", "━".repeat(BOX_WIDTH));
    println!("{title}");
    println!("{}\n", "━".repeat(BOX_WIDTH));
}

/// Print the company line shared by every valuation.
pub(crate) fn company(snapshot: &FinancialSnapshot) {
    println!("Symbol:   {}", snapshot.symbol);
    println!("As of:    {}", snapshot.as_of_date);
    println!(
        "Price:    {:.2} {}",
        snapshot.current_share_price, snapshot.currency
    );
    println!("Shares:   {}", snapshot.shares_outstanding);
    println!();
}

/// Print the per-share value against the market price.
pub(crate) fn verdict_line(label: &str, value_per_share: f64, upside: f64, verdict: Verdict) {
    println!("{label:<24} {value_per_share:>12.2}");
    println!("{:<24} {:>12}", "Upside", percent(upside));
    println!("{:<24} {:>12}", "Verdict", verdict.to_string().to_uppercase());
}

/// Format a decimal rate as a percentage.
pub(crate) fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Print any serializable value as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Render a failed command for stderr. Valuations that are undefined for the
/// given assumptions read as "cannot calculate" rather than as a failure.
pub(crate) fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ValoraError>() {
        Some(e) if e.is_undefined_result() => format!("Cannot calculate: {err:#}"),
        _ => format!("Error: {err:#}"),
    }
}

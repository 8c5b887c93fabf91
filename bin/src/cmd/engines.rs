//! Engine listing command implementation.

use crate::{OutputFormat, report};
use anyhow::Result;
use valora_engine::registry::available_engines;

/// List available valuation engines.
pub(crate) fn list_engines(format: OutputFormat) -> Result<()> {
    let engines = available_engines();

    if format == OutputFormat::Json {
        return report::print_json(&engines);
    }

    report::header("Available Engines");

    for info in &engines {
        println!("{}:", info.name);
        println!("{}", "-".repeat(60));
        println!("  {}", info.description);
        println!("  kind:            {}", info.kind);
        println!("  default horizon: {} years", info.default_horizon);
        if info.uses_root_finding {
            println!("  solver:          bisection");
        }
        if !info.aliases.is_empty() {
            println!("  aliases:         {}", info.aliases.join(", "));
        }
        println!();
    }

    Ok(())
}

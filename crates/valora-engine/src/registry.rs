//! Engine registry for discovering the available valuation engines.
//!
//! This module provides metadata and lookup for every engine in the
//! valora-engine library.

use serde::Serialize;
use valora_traits::{ValuationKind, assumptions::DEFAULT_PROJECTION_YEARS};

/// Metadata about an engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    /// Unique identifier for the engine
    pub name: &'static str,

    /// Alternative names accepted on lookup
    pub aliases: &'static [&'static str],

    /// Kind of valuation produced
    pub kind: ValuationKind,

    /// Human-readable description
    pub description: &'static str,

    /// Default projection horizon in years
    pub default_horizon: u32,

    /// Whether the engine solves for a rate by root finding
    pub uses_root_finding: bool,
}

/// Get information about all available engines.
#[must_use]
pub fn available_engines() -> Vec<EngineInfo> {
    vec![
        EngineInfo {
            name: "dcf",
            aliases: &["discounted_cash_flow"],
            kind: ValuationKind::Dcf,
            description: "Flat-growth free cash flow projection with exit-multiple terminal value",
            default_horizon: DEFAULT_PROJECTION_YEARS,
            uses_root_finding: false,
        },
        EngineInfo {
            name: "reverse_dcf",
            aliases: &["reverse-dcf", "reverse", "implied_growth"],
            kind: ValuationKind::ReverseDcf,
            description: "Growth rate implied by the current market price (bisection)",
            default_horizon: DEFAULT_PROJECTION_YEARS,
            uses_root_finding: true,
        },
        EngineInfo {
            name: "growth",
            aliases: &["multi_phase", "multi-phase"],
            kind: ValuationKind::Growth,
            description: "Growth fade, margin and cost-of-capital convergence with failure blend",
            default_horizon: 10,
            uses_root_finding: false,
        },
    ]
}

/// Get information about an engine by name or alias.
#[must_use]
pub fn get_engine_info(name: &str) -> Option<EngineInfo> {
    let name = name.to_ascii_lowercase();
    available_engines()
        .into_iter()
        .find(|info| info.name == name || info.aliases.contains(&name.as_str()))
}

/// Get information about the engine producing `kind`.
#[must_use]
pub fn engine_for_kind(kind: ValuationKind) -> Option<EngineInfo> {
    available_engines().into_iter().find(|info| info.kind == kind)
}

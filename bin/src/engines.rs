//! Engine lookup utilities for the valora CLI.

use valora_engine::registry::get_engine_info;
use valora_traits::{ValoraError, ValuationKind};

/// Resolve an engine name or alias to the kind of valuation it produces.
pub(crate) fn resolve_kind(name: &str) -> Result<ValuationKind, ValoraError> {
    get_engine_info(name).map(|info| info.kind).ok_or_else(|| {
        ValoraError::InvalidInput(format!(
            "Unknown engine: '{name}'. Use 'valora engines' to list available engines."
        ))
    })
}

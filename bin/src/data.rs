//! Data loading utilities for the valora CLI.

use crate::SourceArgs;
use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use tracing::{debug, warn};
use valora_api::{SnapshotDocument, ValuationApiClient};
use valora_traits::{FinancialSnapshot, ValoraError, ValuationKind};

/// Load the snapshot named by `source`: a JSON file or a service fetch.
///
/// Snapshots that cannot be valued per share are still returned; the engines
/// report a zero per-share value for them.
pub(crate) async fn load_snapshot(
    source: &SourceArgs,
    kind: ValuationKind,
) -> Result<FinancialSnapshot> {
    let snapshot = match (&source.snapshot, &source.symbol) {
        (Some(path), _) => read_snapshot_file(path)?,
        (None, Some(symbol)) => {
            let client = ValuationApiClient::from_env()?;
            debug!(base_url = client.base_url(), %symbol, "fetching snapshot");
            client
                .snapshot(kind, symbol)
                .await
                .with_context(|| format!("Failed to fetch fundamentals for {symbol}"))?
        }
        (None, None) => bail!("either --snapshot or --symbol is required"),
    };

    if let Err(e) = snapshot.validate() {
        warn!(symbol = %snapshot.symbol, error = %e, "snapshot cannot be valued per share");
    }
    Ok(snapshot)
}

/// Read a snapshot file with the same defaults as a service response. A
/// missing symbol takes the file stem and a missing date takes today.
fn read_snapshot_file(path: &Path) -> Result<FinancialSnapshot> {
    let document: SnapshotDocument = read_json(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(document.into_snapshot(&stem, Utc::now().date_naive()))
}

/// Load an assumption set from `path`, or seed one with `seed` if absent.
pub(crate) fn load_assumptions<T, F>(path: Option<&Path>, seed: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match path {
        Some(path) => read_json(path),
        None => Ok(seed()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate, ValoraError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| ValoraError::InvalidInput(format!("Invalid date format: {e}")))
}

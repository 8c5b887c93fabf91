//! Error types for the valuation API client.

use thiserror::Error;
use valora_traits::ValoraError;

/// Errors that can occur when talking to the valuation service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing base URL.
    #[error("VALORA_API_URL environment variable not set")]
    MissingBaseUrl,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-2xx status.
    #[error("Valuation API returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The service returned fundamentals for another company.
    #[error("Requested {requested} but received fundamentals for {received}")]
    SymbolMismatch {
        /// Symbol asked for.
        requested: String,
        /// Symbol in the response.
        received: String,
    },

    /// Environment variable error.
    #[error("Environment error: {0}")]
    Env(#[from] dotenvy::Error),
}

/// HTTP status the service uses when a run is already saved under a key.
pub(crate) const CONFLICT: u16 = 409;

impl From<ApiError> for ValoraError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status {
                status: CONFLICT, ..
            } => Self::DuplicateEntry(err.to_string()),
            err => Self::UpstreamFetch(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_upstream_fetch() {
        let err = ApiError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        let valora: ValoraError = err.into();
        match valora {
            ValoraError::UpstreamFetch(msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_conflict_maps_to_duplicate_entry() {
        let err = ApiError::Status {
            status: CONFLICT,
            body: "exists".to_string(),
        };
        assert!(matches!(ValoraError::from(err), ValoraError::DuplicateEntry(_)));
    }
}

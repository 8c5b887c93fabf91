//! Valuation service client and history stores for valora.
//!
//! This crate talks to the HTTP service that supplies company fundamentals and
//! persists valuation history, and provides an in-memory
//! [`HistoryStore`](valora_traits::HistoryStore) for offline use.
//!
//! # Usage
//!
//! ```rust,ignore
//! use valora_api::ValuationApiClient;
//! use valora_traits::ValuationKind;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ValuationApiClient::from_env()?;
//!
//!     // Fetch fundamentals
//!     let snapshot = client.snapshot(ValuationKind::Dcf, "AAPL").await?;
//!
//!     // Fetch saved runs (empty if none)
//!     let history = client.history(ValuationKind::Dcf, "AAPL").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `VALORA_API_URL` in your environment or `.env` file:
//!
//! ```bash
//! VALORA_API_URL=http://localhost:8000/api
//! ```

mod client;
mod error;
mod history;
mod types;

pub use client::{BASE_URL_ENV, ValuationApiClient};
pub use error::ApiError;
pub use history::InMemoryHistoryStore;
pub use types::*;

/// Result type for valuation API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

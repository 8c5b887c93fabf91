//! Valuation API client implementation.

use crate::{Result, error::ApiError, types::SnapshotDocument};
use chrono::{NaiveDate, Utc};
use reqwest::{Client, Response, StatusCode};
use std::env;
use tracing::{debug, warn};
use valora_traits::{
    Date, FinancialSnapshot, HistoryStore, ValuationHistoryEntry, ValuationKind,
};

/// Environment variable holding the service base URL.
pub const BASE_URL_ENV: &str = "VALORA_API_URL";

/// Client for the valuation service.
///
/// Each method is a single request. Nothing is retried; failures are returned
/// to the caller.
#[derive(Debug, Clone)]
pub struct ValuationApiClient {
    client: Client,
    base_url: String,
}

impl ValuationApiClient {
    /// Create a new client for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a new client from the `VALORA_API_URL` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = env::var(BASE_URL_ENV).map_err(|_| ApiError::MissingBaseUrl)?;

        Ok(Self::new(base_url))
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL under the valuation routes.
    fn url(&self, kind: ValuationKind, path: &str) -> String {
        if path.is_empty() {
            format!("{}/valuation/{kind}", self.base_url)
        } else {
            format!("{}/valuation/{kind}/{path}", self.base_url)
        }
    }

    /// Turn a non-2xx response into [`ApiError::Status`].
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %body, "valuation API request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetch the fundamentals for a symbol.
    ///
    /// Fields missing from the response take the defaults documented on
    /// [`SnapshotDocument`]; a missing date takes today's date.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx, the body
    /// is not valid JSON, or the response names a different symbol.
    pub async fn snapshot(&self, kind: ValuationKind, symbol: &str) -> Result<FinancialSnapshot> {
        let symbol = symbol.to_uppercase();
        let url = self.url(kind, &symbol);
        debug!(%url, "fetching fundamentals");

        let response = Self::check_status(self.client.get(&url).send().await?).await?;
        let text = response.text().await?;
        let document: SnapshotDocument = serde_json::from_str(&text)?;

        if let Some(received) = &document.symbol
            && !received.eq_ignore_ascii_case(&symbol)
        {
            return Err(ApiError::SymbolMismatch {
                requested: symbol,
                received: received.clone(),
            });
        }

        Ok(document.into_snapshot(&symbol, Utc::now().date_naive()))
    }

    /// List saved runs for a symbol.
    ///
    /// A `404` means nothing has been saved yet and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is any other non-2xx,
    /// or the body is not a valid history array.
    pub async fn history(
        &self,
        kind: ValuationKind,
        symbol: &str,
    ) -> Result<Vec<ValuationHistoryEntry>> {
        let url = self.url(kind, &format!("history/{}", symbol.to_uppercase()));
        debug!(%url, "fetching valuation history");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%url, "no saved history");
            return Ok(Vec::new());
        }

        let text = Self::check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 2xx.
    pub async fn save(&self, kind: ValuationKind, entry: &ValuationHistoryEntry) -> Result<()> {
        let url = self.url(kind, "");
        debug!(%url, symbol = %entry.symbol, date = %entry.valuation_date, "saving valuation");

        let response = self.client.post(&url).json(entry).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Delete a saved run. Deleting a run that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is a non-2xx other
    /// than `404`.
    pub async fn delete(
        &self,
        kind: ValuationKind,
        symbol: &str,
        valuation_date: NaiveDate,
    ) -> Result<()> {
        let url = self.url(kind, &symbol.to_uppercase());
        debug!(%url, %valuation_date, "deleting valuation");

        let response = self
            .client
            .delete(&url)
            .query(&[("valuationDate", valuation_date.format("%Y-%m-%d").to_string())])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check_status(response).await?;
        Ok(())
    }
}

impl HistoryStore for ValuationApiClient {
    async fn list(
        &self,
        kind: ValuationKind,
        symbol: &str,
    ) -> valora_traits::Result<Vec<ValuationHistoryEntry>> {
        Ok(self.history(kind, symbol).await?)
    }

    async fn save(
        &self,
        kind: ValuationKind,
        entry: &ValuationHistoryEntry,
    ) -> valora_traits::Result<()> {
        Ok(Self::save(self, kind, entry).await?)
    }

    async fn delete(
        &self,
        kind: ValuationKind,
        symbol: &str,
        valuation_date: Date,
    ) -> valora_traits::Result<()> {
        Ok(Self::delete(self, kind, symbol, valuation_date).await?)
    }
}

//! Wire types for valuation API responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use valora_traits::{BaselineAssumptions, FinancialSnapshot};

/// Equity beta used when the service omits one.
pub const DEFAULT_BETA: f64 = 1.0;

/// Currency used when the service omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Fundamentals document from `GET /valuation/{kind}/{symbol}`.
///
/// Every field is optional on the wire. Missing amounts read as `0`; missing
/// identifiers fall back to the request (see [`SnapshotDocument::into_snapshot`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Reporting date.
    #[serde(default)]
    pub as_of_date: Option<NaiveDate>,
    /// Reporting currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Latest share price.
    #[serde(default)]
    pub current_share_price: f64,
    /// Shares outstanding.
    #[serde(default)]
    pub shares_outstanding: f64,
    /// Total revenue.
    #[serde(default)]
    pub revenue: f64,
    /// Operating income.
    #[serde(default)]
    pub ebit: f64,
    /// Interest expense.
    #[serde(default)]
    pub interest_expense: f64,
    /// Income tax expense.
    #[serde(default)]
    pub income_tax_expense: f64,
    /// Cash and cash equivalents.
    #[serde(default)]
    pub cash_and_equivalents: f64,
    /// Short-term debt.
    #[serde(default)]
    pub short_term_debt: f64,
    /// Long-term debt.
    #[serde(default)]
    pub long_term_debt: f64,
    /// Total current assets.
    #[serde(default)]
    pub total_current_assets: f64,
    /// Total current liabilities.
    #[serde(default)]
    pub total_current_liabilities: f64,
    /// Operating cash flow.
    #[serde(default)]
    pub operating_cash_flow: f64,
    /// Capital expenditure (usually negative).
    #[serde(default)]
    pub capital_expenditure: f64,
    /// Depreciation and amortization.
    #[serde(default)]
    pub depreciation_and_amortization: f64,
    /// Stock-based compensation.
    #[serde(default)]
    pub stock_based_compensation: f64,
    /// Baseline market and history assumptions.
    #[serde(default)]
    pub assumptions: AssumptionsDocument,
}

/// Baseline assumptions block of a [`SnapshotDocument`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionsDocument {
    /// Equity beta; defaults to [`DEFAULT_BETA`].
    #[serde(default)]
    pub beta: Option<f64>,
    /// Risk-free rate.
    #[serde(default)]
    pub risk_free_rate: f64,
    /// Market risk premium.
    #[serde(default)]
    pub market_risk_premium: f64,
    /// Effective tax rate.
    #[serde(default)]
    pub effective_tax_rate: f64,
    /// Historical revenue growth.
    #[serde(default)]
    pub historical_growth_rate: f64,
    /// Historical operating margin.
    #[serde(default)]
    pub historical_operating_margin: f64,
}

impl SnapshotDocument {
    /// Convert into a [`FinancialSnapshot`].
    ///
    /// A missing symbol takes `requested_symbol`, a missing date takes
    /// `fallback_date` and a missing currency takes [`DEFAULT_CURRENCY`].
    #[must_use]
    pub fn into_snapshot(self, requested_symbol: &str, fallback_date: NaiveDate) -> FinancialSnapshot {
        FinancialSnapshot {
            symbol: self
                .symbol
                .unwrap_or_else(|| requested_symbol.to_uppercase()),
            as_of_date: self.as_of_date.unwrap_or(fallback_date),
            current_share_price: self.current_share_price,
            shares_outstanding: self.shares_outstanding,
            currency: self
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            revenue: self.revenue,
            ebit: self.ebit,
            interest_expense: self.interest_expense,
            income_tax_expense: self.income_tax_expense,
            cash_and_equivalents: self.cash_and_equivalents,
            short_term_debt: self.short_term_debt,
            long_term_debt: self.long_term_debt,
            total_current_assets: self.total_current_assets,
            total_current_liabilities: self.total_current_liabilities,
            operating_cash_flow: self.operating_cash_flow,
            capital_expenditure: self.capital_expenditure,
            depreciation_and_amortization: self.depreciation_and_amortization,
            stock_based_compensation: self.stock_based_compensation,
            assumptions: BaselineAssumptions {
                beta: self.assumptions.beta.unwrap_or(DEFAULT_BETA),
                risk_free_rate: self.assumptions.risk_free_rate,
                market_risk_premium: self.assumptions.market_risk_premium,
                effective_tax_rate: self.assumptions.effective_tax_rate,
                historical_growth_rate: self.assumptions.historical_growth_rate,
                historical_operating_margin: self.assumptions.historical_operating_margin,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_empty_document_defaults() {
        let doc: SnapshotDocument = serde_json::from_str("{}").unwrap();
        let snapshot = doc.into_snapshot("acme", date());

        assert_eq!(snapshot.symbol, "ACME");
        assert_eq!(snapshot.as_of_date, date());
        assert_eq!(snapshot.currency, "USD");
        assert_eq!(snapshot.revenue, 0.0);
        assert_eq!(snapshot.shares_outstanding, 0.0);
        assert_eq!(snapshot.assumptions.beta, DEFAULT_BETA);
    }

    #[test]
    fn test_partial_document() {
        let json = r#"{
            "symbol": "MSFT",
            "asOfDate": "2024-06-30",
            "currentSharePrice": 420.5,
            "sharesOutstanding": 7430.0,
            "operatingCashFlow": 118548.0,
            "capitalExpenditure": -44477.0,
            "assumptions": { "beta": 0.9, "riskFreeRate": 0.043 }
        }"#;
        let snapshot = serde_json::from_str::<SnapshotDocument>(json)
            .unwrap()
            .into_snapshot("MSFT", date());

        assert_eq!(snapshot.as_of_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(snapshot.current_share_price, 420.5);
        assert_eq!(snapshot.capital_expenditure, -44477.0);
        assert_eq!(snapshot.long_term_debt, 0.0);
        assert_eq!(snapshot.assumptions.beta, 0.9);
        assert_eq!(snapshot.assumptions.market_risk_premium, 0.0);
    }
}

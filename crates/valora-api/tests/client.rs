//! HTTP client tests against a mock valuation service.

use chrono::NaiveDate;
use serde_json::json;
use valora_api::{ApiError, SnapshotDocument, ValuationApiClient};
use valora_traits::{
    DcfAssumptions, DcfOutput, HistoryStore, ValoraError, ValuationHistoryEntry, ValuationInputs,
    ValuationKind, ValuationOutput, Verdict,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn entry(symbol: &str, valuation_date: &str) -> ValuationHistoryEntry {
    let valuation_date = date(valuation_date);
    let snapshot = SnapshotDocument {
        current_share_price: 100.0,
        shares_outstanding: 10.0,
        operating_cash_flow: 100.0,
        capital_expenditure: -20.0,
        ..SnapshotDocument::default()
    }
    .into_snapshot(symbol, valuation_date);
    let assumptions = DcfAssumptions::from_snapshot(&snapshot);
    ValuationHistoryEntry::new(
        valuation_date,
        snapshot,
        ValuationInputs::Dcf(assumptions),
        ValuationOutput::Dcf(DcfOutput {
            wacc: 0.10,
            projected_cash_flows: Vec::new(),
            terminal_value: 1_932.612,
            present_value: 1_600.0,
            equity_value: 1_600.0,
            intrinsic_value_per_share: 160.0,
            upside: 0.6,
            verdict: Verdict::Undervalued,
        }),
        Some("base case".to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_snapshot_fills_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/valuation/dcf/ACME"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "ACME",
            "asOfDate": "2024-06-30",
            "currentSharePrice": 50.0,
            "sharesOutstanding": 10.0,
            "operatingCashFlow": 100.0
        })))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let snapshot = client.snapshot(ValuationKind::Dcf, "acme").await.unwrap();

    assert_eq!(snapshot.symbol, "ACME");
    assert_eq!(snapshot.as_of_date, date("2024-06-30"));
    assert_eq!(snapshot.operating_cash_flow, 100.0);
    assert_eq!(snapshot.capital_expenditure, 0.0);
    assert_eq!(snapshot.long_term_debt, 0.0);
    assert_eq!(snapshot.currency, "USD");
}

#[tokio::test]
async fn test_snapshot_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/valuation/growth/ACME"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let err = client
        .snapshot(ValuationKind::Growth, "ACME")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 502, .. }));

    let err: ValoraError = err.into();
    assert!(matches!(err, ValoraError::UpstreamFetch(_)));
}

#[tokio::test]
async fn test_snapshot_symbol_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/valuation/dcf/ACME"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "symbol": "OTHER" })))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let err = client.snapshot(ValuationKind::Dcf, "ACME").await.unwrap_err();
    assert!(matches!(err, ApiError::SymbolMismatch { .. }));
}

#[tokio::test]
async fn test_history_not_found_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/valuation/reverse-dcf/history/ACME"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let history = client
        .history(ValuationKind::ReverseDcf, "ACME")
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_history_decodes_entries() {
    let server = MockServer::start().await;
    let saved = vec![entry("ACME", "2024-01-31"), entry("ACME", "2024-03-31")];
    Mock::given(method("GET"))
        .and(path("/valuation/dcf/history/ACME"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&saved))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let history = HistoryStore::list(&client, ValuationKind::Dcf, "ACME")
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[1].valuation_date, date("2024-03-31"));
    assert_eq!(history[0].user_comments.as_deref(), Some("base case"));
    assert_eq!(history[0].output.verdict(), Verdict::Undervalued);
}

#[tokio::test]
async fn test_history_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/valuation/dcf/history/ACME"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let err = client.history(ValuationKind::Dcf, "ACME").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_save_posts_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/valuation/dcf"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    client
        .save(ValuationKind::Dcf, &entry("ACME", "2024-01-31"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_save_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/valuation/dcf"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid entry"))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let err = client
        .save(ValuationKind::Dcf, &entry("ACME", "2024-01-31"))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body, "invalid entry");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_save_existing_run_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/valuation/dcf"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already saved"))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let err = HistoryStore::save(&client, ValuationKind::Dcf, &entry("ACME", "2024-01-31"))
        .await
        .unwrap_err();
    assert!(matches!(err, ValoraError::DuplicateEntry(_)));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/valuation/dcf/ACME"))
        .and(query_param("valuationDate", "2024-01-31"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    client
        .delete(ValuationKind::Dcf, "ACME", date("2024-01-31"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/valuation/growth/ACME"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ValuationApiClient::new(server.uri());
    let result = client
        .delete(ValuationKind::Growth, "ACME", date("2024-01-31"))
        .await;
    assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
}

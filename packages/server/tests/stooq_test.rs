//! Tests of the Stooq quote adapter against a local stub.

use std::{collections::HashMap, net::SocketAddr, time::Duration};

use axum::{Router, extract::Query, http::StatusCode, routing::get};
use quoteroom_server::{
    domain::{QuoteError, QuoteSource},
    infrastructure::quote::StooqQuoteSource,
};

const HEADER: &str = "Symbol,Date,Time,Open,High,Low,Close,Volume";

async fn quote_stub(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    let format_ok = params.get("f").map(String::as_str) == Some("sd2t2ohlcv")
        && params.get("e").map(String::as_str) == Some("csv")
        && params.contains_key("h");
    if !format_ok {
        return (StatusCode::BAD_REQUEST, "bad format".to_string());
    }

    match params.get("s").map(String::as_str) {
        Some("aapl.us") => (
            StatusCode::OK,
            format!("{HEADER}\r\nAAPL.US,2026-10-16,22:00:09,230.1,232.5,229.8,231.05,41000200\r\n"),
        ),
        Some("zzzz") => (
            StatusCode::OK,
            format!("{HEADER}\r\nZZZZ,N/D,N/D,N/D,N/D,N/D,N/D,N/D\r\n"),
        ),
        Some("garbage") => (StatusCode::OK, "<html>nope</html>".to_string()),
        Some("slow") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, String::new())
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
    }
}

async fn start_stub() -> SocketAddr {
    let app = Router::new().route("/q/l/", get(quote_stub));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn source(timeout: Duration) -> StooqQuoteSource {
    let addr = start_stub().await;
    StooqQuoteSource::new(format!("http://{}/q/l/", addr), timeout).unwrap()
}

#[tokio::test]
async fn test_fetch_quote_parses_csv() {
    let source = source(Duration::from_secs(2)).await;

    let quote = source.fetch_quote("aapl.us").await.unwrap();

    assert_eq!(quote.symbol, "AAPL.US");
    assert_eq!(quote.close, "231.05");
    assert_eq!(quote.announcement(), "AAPL.US quote is $231.05 per share");
}

#[tokio::test]
async fn test_fetch_quote_maps_failures() {
    let source = source(Duration::from_secs(2)).await;

    assert_eq!(
        source.fetch_quote("zzzz").await,
        Err(QuoteError::Unavailable("ZZZZ".to_string()))
    );
    assert!(matches!(
        source.fetch_quote("garbage").await,
        Err(QuoteError::Malformed(_))
    ));
    assert_eq!(
        source.fetch_quote("error").await,
        Err(QuoteError::Status(500))
    );
}

#[tokio::test]
async fn test_fetch_quote_times_out() {
    let source = source(Duration::from_millis(200)).await;

    let result = source.fetch_quote("slow").await;

    assert!(matches!(result, Err(QuoteError::Request(_))));
}

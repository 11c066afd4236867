//! TradingView webhook receiver.
//!
//! The body is read as raw bytes and decoded as JSON regardless of the
//! `Content-Type` header, because TradingView sends alert messages as
//! `text/plain` unless they happen to be valid JSON.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::problem::{from_body_rejection, Problem};
use crate::application::ingest::{Alert, IngestService, StoreHealth};
use crate::domain::quote::Quote;
use crate::error::Error;

/// Alert body as configured in the TradingView alert message.
///
/// Numbers may also be sent as strings (`"price": "150.25"`).
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub symbol: String,
    pub price: Decimal,
    pub atr: Decimal,
    #[serde(default)]
    pub passphrase: Option<String>,
}

impl From<WebhookPayload> for Alert {
    fn from(payload: WebhookPayload) -> Self {
        Self {
            symbol: payload.symbol,
            price: payload.price,
            atr: payload.atr,
            passphrase: payload.passphrase,
        }
    }
}

#[derive(Debug, Serialize)]
struct QuoteData {
    symbol: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    price: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    atr: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    exit_price: Decimal,
}

impl From<&Quote> for QuoteData {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.to_string(),
            price: quote.price,
            atr: quote.atr,
            exit_price: quote.exit_price(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WebhookResponse {
    status: &'static str,
    message: String,
    data: QuoteData,
}

/// Legacy `/alert` body. Fields are echoed back as sent.
#[derive(Debug, Default, Deserialize)]
struct LegacyAlert {
    #[serde(default)]
    ticker: Value,
    #[serde(default)]
    price: Value,
}

/// Build the webhook router.
pub fn router(ingest: Arc<IngestService>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/webhook", post(receive))
        .route("/health", get(health))
        .route("/alert", post(legacy_alert))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(ingest)
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": "TradingView Webhook Receiver",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "webhook": "/webhook (POST)",
            "health": "/health (GET)",
        },
    }))
}

async fn receive(
    State(ingest): State<Arc<IngestService>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WebhookResponse>, Problem> {
    let body = body.map_err(from_body_rejection)?;
    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(Error::from)?;

    let quote = ingest.ingest(payload.into()).await?;

    Ok(Json(WebhookResponse {
        status: "success",
        message: format!("Data for {} received and stored", quote.symbol),
        data: QuoteData::from(&quote),
    }))
}

async fn health(State(ingest): State<Arc<IngestService>>) -> Response {
    match ingest.health().await {
        StoreHealth::Connected { symbols } => Json(json!({
            "status": "healthy",
            "database": "connected",
            "records_count": symbols,
        }))
        .into_response(),
        StoreHealth::Failed { error } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "error",
                "error": error,
            })),
        )
            .into_response(),
    }
}

async fn legacy_alert(body: Result<Bytes, BytesRejection>) -> Result<Json<Value>, Problem> {
    let body = body.map_err(from_body_rejection)?;
    let alert: LegacyAlert = serde_json::from_slice(&body).map_err(Error::from)?;

    info!(ticker = %alert.ticker, price = %alert.price, "Legacy alert received");

    Ok(Json(json!({
        "ticker": alert.ticker,
        "price": alert.price,
        "message": "Data received successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payload_accepts_numbers_and_strings() {
        let from_numbers: WebhookPayload =
            serde_json::from_str(r#"{"symbol":"AAPL","price":150.25,"atr":2.35}"#).unwrap();
        let from_strings: WebhookPayload =
            serde_json::from_str(r#"{"symbol":"AAPL","price":"150.25","atr":"2.35"}"#).unwrap();

        assert_eq!(from_numbers.price, dec!(150.25));
        assert_eq!(from_strings.atr, dec!(2.35));
        assert!(from_numbers.passphrase.is_none());
    }

    #[test]
    fn payload_requires_atr() {
        let result = serde_json::from_str::<WebhookPayload>(r#"{"symbol":"AAPL","price":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn quote_data_serializes_numbers() {
        let quote = crate::testkit::domain::quote(1, "AAPL", dec!(150.25), dec!(2.35), 0);
        let json = serde_json::to_value(QuoteData::from(&quote)).unwrap();
        assert_eq!(json["price"], 150.25);
        assert_eq!(json["exit_price"], 147.9);
    }
}

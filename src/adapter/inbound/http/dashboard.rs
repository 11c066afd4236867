//! Dashboard service: HTML page, CSV download, and a small JSON API.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use super::problem::Problem;
use super::render::dashboard_page;
use crate::application::dashboard::{export_csv, export_filename, DashboardService};
use crate::domain::quote::Quote;
use crate::domain::summary::Summary;
use crate::infrastructure::config::server::DashboardConfig;

#[derive(Clone)]
struct DashboardState {
    service: Arc<DashboardService>,
    config: Arc<DashboardConfig>,
}

/// JSON view of a stored quote.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub symbol: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub atr: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub exit_price: Decimal,
    pub timestamp: String,
}

impl From<&Quote> for QuoteView {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.to_string(),
            price: quote.price,
            atr: quote.atr,
            exit_price: quote.exit_price(),
            timestamp: quote.display_timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LatestView {
    summary: Option<Summary>,
    quotes: Vec<QuoteView>,
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    limit: Option<u32>,
}

/// Build the dashboard router.
pub fn router(service: Arc<DashboardService>, config: DashboardConfig) -> Router {
    let state = DashboardState {
        service,
        config: Arc::new(config),
    };
    Router::new()
        .route("/", get(page))
        .route("/download.csv", get(download_csv))
        .route("/api/latest", get(latest))
        .route("/api/history", get(history))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn page(State(state): State<DashboardState>) -> Result<Html<String>, Problem> {
    let snapshot = state.service.snapshot().await?;
    Ok(Html(dashboard_page(&state.config, &snapshot)))
}

async fn download_csv(State(state): State<DashboardState>) -> Result<Response, Problem> {
    let snapshot = state.service.snapshot().await?;
    let disposition = format!(
        "attachment; filename={}",
        export_filename(snapshot.generated_at)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export_csv(&snapshot.quotes),
    )
        .into_response())
}

async fn latest(State(state): State<DashboardState>) -> Result<Json<LatestView>, Problem> {
    let snapshot = state.service.snapshot().await?;
    Ok(Json(LatestView {
        quotes: snapshot.quotes.iter().map(QuoteView::from).collect(),
        summary: snapshot.summary,
    }))
}

async fn history(
    State(state): State<DashboardState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<QuoteView>>, Problem> {
    let quotes = state.service.history(params.limit).await?;
    Ok(Json(quotes.iter().map(QuoteView::from).collect()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::history::{
    BOND_RETURNS, DATA_VERSION, SILVER_PRICES, SP500_RETURNS, TOTAL_MARKET_RETURNS, chart_labels,
    years,
};
use crate::core::{Page, PageReport, Scenario, build_report};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScenarioPayload {
    pub bond_offset: Option<i32>,
    pub cap_gains_rate: Option<f64>,
    pub start_age: Option<u32>,
    pub principal: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportResponse {
    page: Page,
    data_version: &'static str,
    report: PageReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    data_version: &'static str,
    years: Vec<u32>,
    labels: Vec<String>,
    sp500_returns: &'static [f64],
    total_market_returns: &'static [f64],
    bond_returns: &'static [f64],
    silver_prices: &'static [f64],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    data_version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Applies payload overrides on top of the default scenario.
pub fn scenario_from_payload(payload: ScenarioPayload) -> Result<Scenario, String> {
    let mut scenario = Scenario::default();

    if let Some(v) = payload.bond_offset {
        scenario.bond_offset = v;
    }
    if let Some(v) = payload.cap_gains_rate {
        scenario.cap_gains_rate = v;
    }
    if let Some(v) = payload.start_age {
        scenario.start_age = v;
    }
    if let Some(v) = payload.principal {
        scenario.principal = v;
    }

    scenario.validated().map_err(|e| e.to_string())
}

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/history", get(history_handler))
        .route(
            "/api/glide-path",
            get(glide_path_get_handler).post(glide_path_post_handler),
        )
        .route("/api/roth", get(roth_get_handler).post(roth_post_handler))
        .route(
            "/api/silver",
            get(silver_get_handler).post(silver_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, data_version = DATA_VERSION, "hindsight API listening");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            data_version: DATA_VERSION,
        },
    )
}

async fn history_handler() -> Response {
    json_response(StatusCode::OK, history_response())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn glide_path_get_handler(
    query: Result<Query<ScenarioPayload>, QueryRejection>,
) -> Response {
    report_response(Page::GlidePath, payload_from_query(query))
}

async fn glide_path_post_handler(body: Result<Json<ScenarioPayload>, JsonRejection>) -> Response {
    report_response(Page::GlidePath, payload_from_json(body))
}

async fn roth_get_handler(query: Result<Query<ScenarioPayload>, QueryRejection>) -> Response {
    report_response(Page::Roth, payload_from_query(query))
}

async fn roth_post_handler(body: Result<Json<ScenarioPayload>, JsonRejection>) -> Response {
    report_response(Page::Roth, payload_from_json(body))
}

async fn silver_get_handler(query: Result<Query<ScenarioPayload>, QueryRejection>) -> Response {
    report_response(Page::Silver, payload_from_query(query))
}

async fn silver_post_handler(body: Result<Json<ScenarioPayload>, JsonRejection>) -> Response {
    report_response(Page::Silver, payload_from_json(body))
}

fn payload_from_query(
    query: Result<Query<ScenarioPayload>, QueryRejection>,
) -> Result<ScenarioPayload, String> {
    query
        .map(|Query(payload)| payload)
        .map_err(|rejection| rejection.body_text())
}

fn payload_from_json(
    json_body: Result<Json<ScenarioPayload>, JsonRejection>,
) -> Result<ScenarioPayload, String> {
    json_body
        .map(|Json(payload)| payload)
        .map_err(|rejection| rejection.body_text())
}

fn report_response(page: Page, payload: Result<ScenarioPayload, String>) -> Response {
    let scenario = match payload.and_then(scenario_from_payload) {
        Ok(scenario) => scenario,
        Err(msg) => {
            warn!(?page, %msg, "rejected scenario");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match build_report(page, &scenario) {
        Ok(report) => json_response(
            StatusCode::OK,
            ReportResponse {
                page,
                data_version: DATA_VERSION,
                report,
            },
        ),
        Err(e) => {
            warn!(?page, error = %e, "report failed");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

fn history_response() -> HistoryResponse {
    HistoryResponse {
        data_version: DATA_VERSION,
        years: years(),
        labels: chart_labels(),
        sp500_returns: &SP500_RETURNS,
        total_market_returns: &TOTAL_MARKET_RETURNS,
        bond_returns: &BOND_RETURNS,
        silver_prices: &SILVER_PRICES,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

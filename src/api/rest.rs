// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Scan endpoints run a scan synchronously per request and return the JSON
// report, matching the serverless-function shape the scanner replaces.
//
//   GET /api/health
//   GET /api/scan?mode=full|light
//   GET /api/pingr          (alias: mode=full)
//   GET /api/pingr_light    (alias: mode=light)
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::binance::RateLimitSnapshot;
use crate::types::ScanMode;

// =============================================================================
// Router construction
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/scan", get(scan))
        .route("/api/pingr", get(pingr))
        .route("/api/pingr_light", get(pingr_light))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    started_at: i64,
    scans_run: u64,
    webhook_configured: bool,
    rate_limit: RateLimitSnapshot,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        started_at: state.started_at.timestamp_millis(),
        scans_run: state.scans_run(),
        webhook_configured: state.scanner.notifier().is_configured(),
        rate_limit: state.scanner.client().rate_limit().snapshot(),
    })
}

// =============================================================================
// Scans
// =============================================================================

#[derive(Debug, Deserialize)]
struct ScanQuery {
    #[serde(default)]
    mode: ScanMode,
}

async fn scan(State(state): State<Arc<AppState>>, Query(q): Query<ScanQuery>) -> Response {
    run_scan(&state, q.mode).await
}

async fn pingr(State(state): State<Arc<AppState>>) -> Response {
    run_scan(&state, ScanMode::Full).await
}

async fn pingr_light(State(state): State<Arc<AppState>>) -> Response {
    run_scan(&state, ScanMode::Light).await
}

async fn run_scan(state: &AppState, mode: ScanMode) -> Response {
    let n = state.record_scan();
    info!(%mode, scan = n, "scan requested");

    match state.scanner.run(mode).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            warn!(%mode, error = %e, "scan aborted: config load failed");
            let body = serde_json::json!({
                "status": "Config load failed",
                "error": format!("{e:#}"),
                "timestamp": chrono::Utc::now(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::binance::BinanceClient;
    use crate::notifier::Notifier;
    use crate::runtime_config::ConfigLoader;
    use crate::scanner::Scanner;

    fn state(base_url: String, config_path: Option<&str>) -> Arc<AppState> {
        let scanner = Scanner::new(
            BinanceClient::new(base_url, vec![]).unwrap(),
            Notifier::new(None).unwrap(),
            ConfigLoader::new(None, config_path.map(Into::into), None).unwrap(),
        );
        Arc::new(AppState::new(scanner))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(state("http://127.0.0.1:9".into(), None));
        let (status, body) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["scans_run"], 0);
        assert_eq!(body["webhook_configured"], false);
    }

    #[tokio::test]
    async fn light_scan_config_failure_is_500() {
        let app = router(state("http://127.0.0.1:9".into(), Some("/nonexistent/pingr.json")));
        let (status, body) = get_json(app, "/api/pingr_light").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "Config load failed");
        assert!(body["error"].as_str().unwrap().contains("pingr.json"));
    }

    #[tokio::test]
    async fn scan_endpoint_selects_mode() {
        let mut binance = mockito::Server::new_async().await;
        binance
            .mock("GET", "/fapi/v1/ticker/24hr")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"lastPrice":"10.5","priceChangePercent":"5.0","quoteVolume":"90000000"}"#,
            )
            .create_async()
            .await;

        let app_state = state(binance.url(), None);
        let app = router(app_state.clone());
        let (status, body) = get_json(app, "/api/scan?mode=light").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "light");
        assert_eq!(body["pairs_checked"], 3);
        assert_eq!(body["results"][0]["strong_move"], true);
        assert_eq!(body["results"][0]["signal"], "MomentumSpike");
        assert_eq!(app_state.scans_run(), 1);
    }
}

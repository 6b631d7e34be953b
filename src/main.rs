// =============================================================================
// Pingr — Main Entry Point
// =============================================================================
//
// Two ways to run:
//   - default: serve the scan endpoints over HTTP
//   - PINGR_RUN_ONCE=1: run a single scan (PINGR_MODE), print the JSON report
//     and exit
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pingr::app_state::AppState;
use pingr::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & settings ────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    info!(?settings, "Pingr starting");

    if settings.config_url.is_none() && settings.config_path.is_none() {
        warn!("no PINGR_CONFIG_URL or PINGR_CONFIG_PATH set, scans use default config");
    }

    // ── 2. Shared state ──────────────────────────────────────────────────
    let state = Arc::new(AppState::from_settings(&settings)?);

    // ── 3a. One-shot scan ────────────────────────────────────────────────
    if settings.run_once {
        state.record_scan();
        let report = state.scanner.run(settings.mode).await?;
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialise scan report")?
        );
        return Ok(());
    }

    // ── 3b. HTTP server ──────────────────────────────────────────────────
    let app = pingr::api::router(state);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            warn!("Shutdown signal received, stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Pingr shut down complete.");
    Ok(())
}

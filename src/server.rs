//! Axum server exposing the status snapshot

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::collector::StatusCollector;
use crate::config::ProbeConfig;
use crate::snapshot::StatusSnapshot;

/// Health handler: collect a snapshot and return it as JSON.
///
/// Always answers with a body. The status is 200 unless every probe failed,
/// in which case it is 503.
async fn status_handler(
    State(collector): State<StatusCollector>,
) -> (StatusCode, Json<StatusSnapshot>) {
    let started_at = chrono::Utc::now();
    tracing::info!("{} | Getting Virtuoso status", started_at);

    let snapshot = collector.collect_at(started_at).await;

    let failed = snapshot.failed_subsystems();
    let code = if snapshot.all_failed() {
        tracing::error!("All probes failed, reporting service unavailable");
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        if !failed.is_empty() {
            tracing::warn!("Degraded snapshot, failed probes: {:?}", failed);
        }
        StatusCode::OK
    };

    tracing::info!(
        "Status: healthy={} buffers={} disk={} memory={}",
        snapshot.healthy,
        snapshot.buffers.stats.healthy,
        snapshot.disk.stats.healthy,
        snapshot.memory.stats.healthy
    );

    (code, Json(snapshot))
}

/// Router serving the snapshot on the configured route
pub fn router(collector: StatusCollector) -> Router {
    let route = collector.config().route.clone();

    Router::new()
        .route(&route, get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(collector)
}

/// Run the status server until Ctrl-C
pub async fn run_server(config: ProbeConfig) -> anyhow::Result<()> {
    let addr = config.listen_addr();
    let route = config.route.clone();

    tracing::info!("Starting Virtuoso status server at {}", chrono::Utc::now());
    tracing::info!(
        "Probing {} (script {}), data dir {}",
        config.endpoint,
        config.status_script,
        config.data_dir
    );

    let app = router(StatusCollector::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    tracing::info!("Listening on http://{}{}", addr, route);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! UniPath API Gateway
//!
//! The HTTP entry point for the marketing site.
//! Handles:
//! - University directory listing, options, and detail
//! - Admin create/replace/visibility of university records
//! - Lead capture (rate limited)
//! - Observability (logging, metrics, request ids)

mod handlers;
mod middleware;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use unipath_common::{
    config::AppConfig,
    db::{DbPool, LeadStore, Repository, UniversityStore},
    metrics, telemetry,
};

use crate::middleware::rate_limit::{self, LeadLimiter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub universities: Arc<dyn UniversityStore>,
    pub leads: Arc<dyn LeadStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    telemetry::init_tracing(&config.observability);

    info!("Starting UniPath API Gateway v{}", unipath_common::VERSION);

    let config = Arc::new(config);

    let metrics_handle = if config.observability.metrics_enabled {
        let handle = prometheus_builder()?.install_recorder()?;
        metrics::register_metrics();
        Some(handle)
    } else {
        None
    };

    let db = DbPool::new(&config.database).await?;
    db.ensure_schema().await?;
    let repo = Arc::new(Repository::new(db));

    let state = AppState {
        config: config.clone(),
        universities: repo.clone(),
        leads: repo,
    };

    let app = create_router(state, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Exporter with latency histograms bucketed rather than summarized
fn prometheus_builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets(metrics::LATENCY_BUCKETS)
}

/// Create the main application router
fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let limiter: Option<LeadLimiter> = state
        .config
        .rate_limit
        .enabled
        .then(|| rate_limit::create_rate_limiter(&state.config.rate_limit));

    let lead_routes = Router::new()
        .route("/leads", post(handlers::leads::create_lead))
        .route_layer(from_fn_with_state(limiter, rate_limit::rate_limit_middleware));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route(
            "/universities",
            get(handlers::universities::list_universities)
                .post(handlers::universities::create_university),
        )
        .route("/universities/options", get(handlers::universities::directory_options))
        .route(
            "/universities/{slug}",
            get(handlers::universities::get_university)
                .put(handlers::universities::replace_university),
        )
        .route(
            "/universities/{slug}/active",
            patch(handlers::universities::set_university_active),
        )
        .merge(lead_routes);

    let mut app = Router::new().nest("/v1", api_routes);

    if let Some(handle) = metrics_handle {
        app = app.route("/metrics", get(move || async move { handle.render() }));
    }

    app.layer(from_fn(crate::middleware::request_metrics))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ))
        .layer(ConcurrencyLimitLayer::new(state.config.server.max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    let origin = if allowed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}

#[cfg(test)]
pub(crate) mod test_support;

//! HTTP surface: health check and API root under a configurable prefix.

use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Service name reported by the API root.
pub const SERVICE_NAME: &str = "family-task-backend";

/// Router configuration derived from application settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Normalised path prefix: empty, or starting with `/` and never ending
    /// with one.
    pub api_prefix: String,
    /// Deployment environment reported by the health check.
    pub environment: String,
    /// Origins allowed to make credentialed cross-origin requests.
    pub allowed_origins: Vec<HeaderValue>,
}

#[derive(Debug, Clone)]
struct HttpState {
    environment: String,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    environment: String,
}

#[derive(Debug, Serialize)]
struct ApiRootBody {
    name: &'static str,
    status: &'static str,
}

/// Builds the router serving `{prefix}/health` and `{prefix}`.
#[must_use]
pub fn build_router(settings: &HttpSettings) -> Router {
    let state = HttpState {
        environment: settings.environment.clone(),
    };
    let prefix = settings.api_prefix.trim_end_matches('/');
    let root_path = if prefix.is_empty() { "/" } else { prefix };
    let health_path = format!("{prefix}/health");

    Router::new()
        .route(root_path, get(api_root))
        .route(&health_path, get(health))
        .with_state(state)
        .layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Serves `router` on `listener` until Ctrl-C is received.
///
/// # Errors
///
/// Returns the I/O error raised when the listener fails.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "http server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("http server stopped");
    Ok(())
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}

async fn health(State(state): State<HttpState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        environment: state.environment,
    })
}

async fn api_root() -> Json<ApiRootBody> {
    Json(ApiRootBody {
        name: SERVICE_NAME,
        status: "ok",
    })
}

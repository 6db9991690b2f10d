//! Diploma generation web service
//!
//! Serves the upload form, two sample files and the `/generate` endpoint
//! that turns a DOCX template plus a workbook into a ZIP of diplomas.

pub mod assets;
pub mod config;
mod error;
mod handlers;
mod state;
pub mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use handlers::*;
pub use state::AppService;

/// Registered routes, logged at startup
pub const ROUTES: &[(&str, &str)] = &[
    ("/", "GET"),
    ("/app.js", "GET"),
    ("/health", "GET"),
    ("/download-excel", "GET"),
    ("/download-word", "GET"),
    ("/generate", "POST"),
];

/// Build the router with all endpoints
pub fn build_router(service: Arc<AppService>) -> Router {
    let body_limit = service.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/app.js", get(app_js))
        .route("/health", get(health_check))
        .route("/download-excel", get(download_excel))
        .route("/download-word", get(download_word))
        .route("/generate", post(generate))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Install the tracing subscriber; `RUST_LOG` overrides `default_filter`
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start the server and run until it fails
pub async fn start_server(config: ServerConfig) -> Result<(), std::io::Error> {
    let addr = config.addr();
    let service = Arc::new(AppService::new(config));

    tracing::info!("Starting diploma server on {}", addr);
    tracing::info!(
        "Assets in {}, samples also looked up in {}",
        service.assets_dir().display(),
        service.work_dir.display()
    );
    for (path, method) in ROUTES {
        tracing::info!("Route {} [{}]", path, method);
    }

    let app = build_router(service);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_cover_router() {
        let service = Arc::new(AppService::new(ServerConfig::default()));
        let _router = build_router(service);
        assert_eq!(ROUTES.len(), 6);
        assert!(ROUTES.contains(&("/generate", "POST")));
    }
}

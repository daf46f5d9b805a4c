//! Application startup and lifecycle management.

use crate::config::ProjectConfig;
use crate::handlers::{
    attachments, dashboard, financials, health_check, metrics_handler, projects, readiness_check,
};
use crate::services::{init_metrics, Database};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::{make_request_span, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ProjectConfig,
    pub db: Arc<Database>,
}

/// HTTP routes with the shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .route("/financials/summary", post(financials::summarize))
        .route("/financials/breakdown", post(financials::breakdown))
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/:project_id",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/projects/:project_id/line-items",
            put(projects::save_line_items),
        )
        .route(
            "/projects/:project_id/financials",
            get(financials::project_financials),
        )
        .route(
            "/projects/:project_id/ac-units",
            post(projects::add_ac_unit),
        )
        .route(
            "/projects/:project_id/ac-units/:index",
            put(projects::update_ac_unit).delete(projects::delete_ac_unit),
        )
        .route(
            "/projects/:project_id/photos",
            post(attachments::upload_photos),
        )
        .route(
            "/projects/:project_id/photos/:index",
            axum::routing::delete(attachments::delete_photo),
        )
        .route(
            "/projects/:project_id/documents/:category",
            post(attachments::upload_document),
        )
        .route(
            "/projects/:project_id/documents/:category/:index",
            axum::routing::delete(attachments::delete_document),
        )
        .route("/dashboard", get(dashboard::dashboard))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span::<axum::body::Body>)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration, running migrations.
    pub async fn build(config: ProjectConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let state = AppState {
            config: config.clone(),
            db: Arc::new(db),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Project service listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!(
            service = "project-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}

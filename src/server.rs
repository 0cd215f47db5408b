// ABOUTME: Router assembly and HTTP serve loop for the FitBurn server
// ABOUTME: Merges domain routers, applies middleware layers, and serves uploads statically
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and serve loop

use crate::resources::ServerResources;
use crate::routes::{AnalysisRoutes, AuthRoutes, CaloriesRoutes, HealthRoutes, ProfileRoutes};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
///
/// Uploaded avatars are served statically under `/uploads`.
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let uploads_dir = resources.config.uploads_dir.clone();

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(ProfileRoutes::routes(resources.clone()))
        .merge(CaloriesRoutes::routes(resources.clone()))
        .merge(AnalysisRoutes::routes(resources))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
///
/// Returns an error if binding or serving fails.
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let port = resources.config.http_port;
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("HTTP server listening on port {port}");

    axum::serve(listener, router).await?;
    Ok(())
}

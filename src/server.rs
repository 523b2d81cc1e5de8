use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::error::ApiError;
use crate::models::{CatalogCard, SearchHit, SearchRequest};
use crate::search::SearchService;

type AppState = Arc<SearchService>;

/// Routes for the persistent server.
pub fn router(service: SearchService, server: &config::Server) -> Router {
    Router::new()
        .route("/api/search", post(search))
        .route("/api/featured-cards", get(featured_cards))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(service))
}

fn cors_layer(server: &config::Server) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(server.allow_credentials)
}

async fn search(
    State(service): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected search body");
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let hits = service.search(&request).await?;
    Ok(Json(hits))
}

async fn featured_cards(State(service): State<AppState>) -> Json<Vec<CatalogCard>> {
    Json(service.featured().await)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let service = SearchService::new(config)?;
    let app = router(service, &config.server);

    let listener = TcpListener::bind(&config.server.bind).await?;
    info!(
        addr = %listener.local_addr()?,
        public_url = %config.server.public_base_url,
        origins = ?config.server.allowed_origins,
        "backend running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

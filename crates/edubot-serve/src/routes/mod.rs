pub mod documents;
pub mod error;
pub mod logs;
pub mod messages;
pub mod tramites;

use crate::middleware::correlation::correlation_middleware;
use crate::{AppState, openapi, static_files};
use axum::Router;
use axum::middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(messages::router(state.clone()))
        .merge(tramites::router(state.clone()))
        .merge(logs::router(state.clone()))
        .merge(documents::router(state.clone()))
        .merge(openapi::router())
        .layer(CorsLayer::permissive())
        .route_layer(middleware::from_fn(correlation_middleware));

    let router = Router::new().nest("/api", api);
    let router = match &state.static_dir {
        Some(dir) => router.fallback_service(static_files::service(dir)),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}

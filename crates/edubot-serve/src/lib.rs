pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod static_files;

use axum::Router;
use edubot_core::inference::InferenceConfig;
use edubot_core::{Edubot, EdubotError};
use edubot_db::schema;
use edubot_db::store::DbStore;
use edubot_events::bus::EventBus;
use edubot_pdf::Renderer;
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
    pub docs_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub event_bus: EventBus,
    pub inference: Option<InferenceConfig>,
}

/// Opens a fresh store for the current request; no ambient connections.
pub fn build_edubot(state: &AppState) -> Result<Edubot<DbStore>, EdubotError> {
    let conn = schema::open_and_migrate(&state.db_path).map_err(|err| EdubotError::Internal {
        message: err.to_string(),
    })?;
    let store = DbStore::new(conn);
    Ok(Edubot::new(
        store,
        state.event_bus.clone(),
        state.inference.clone(),
        Renderer::new(state.docs_dir.clone()),
    ))
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await
}

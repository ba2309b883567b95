use crate::AppState;
use crate::routes::error::map_error;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use edubot_core::EdubotError;
use edubot_core::error::TramiteError;
use edubot_pdf::Renderer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/descargar-pdf/{id}", get(download))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/descargar-pdf/{id}",
    params(("id" = i64, Path, description = "Submission id")),
    responses(
        (status = 200, description = "document attachment"),
        (status = 404, description = "no document for this id"),
    )
)]
pub(crate) async fn download(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let renderer = Renderer::new(state.docs_dir.clone());
    let Some((path, format)) = renderer.find(id) else {
        return map_error(&EdubotError::from(TramiteError::NotFound), None).into_response();
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| Renderer::pdf_name(id));
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => map_error(&EdubotError::from(TramiteError::NotFound), None).into_response(),
    }
}

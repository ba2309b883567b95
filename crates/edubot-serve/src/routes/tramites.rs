use crate::middleware::correlation::CorrelationId;
use crate::routes::error::{internal_error, map_error};
use crate::{AppState, build_edubot};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use edubot_core::RequestContext;
use edubot_core::types::io::{TramiteInput, TramiteReceipt};
use edubot_core::types::tramite::Tramite;
use tracing::error;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tramite", post(create_tramite))
        .route("/tramites", get(list_tramites))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/tramite",
    request_body = TramiteInput,
    responses(
        (status = 201, body = TramiteReceipt),
        (status = 400, description = "missing required fields"),
    )
)]
pub(crate) async fn create_tramite(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Json(input): Json<TramiteInput>,
) -> Response {
    let correlation_id = correlation.0.clone();
    // Rendering runs synchronously inside the request; keep it off the
    // async workers.
    let result = tokio::task::spawn_blocking(move || {
        let edubot = build_edubot(&state)?;
        let ctx = RequestContext::new(Some(correlation.0));
        edubot.tramites().submit(&ctx, input)
    })
    .await;
    match result {
        Ok(Ok(receipt)) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Ok(Err(err)) => map_error(&err, Some(correlation_id)).into_response(),
        Err(err) => {
            error!(error = %err, "submission pipeline panicked");
            internal_error(Some(correlation_id)).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/tramites",
    responses((status = 200, body = Vec<Tramite>))
)]
pub(crate) async fn list_tramites(State(state): State<AppState>) -> Response {
    let edubot = match build_edubot(&state) {
        Ok(edubot) => edubot,
        Err(err) => return map_error(&err, None).into_response(),
    };
    match edubot.tramites().list() {
        Ok(tramites) => Json(tramites).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

use crate::middleware::correlation::CorrelationId;
use crate::routes::error::{internal_error, map_error};
use crate::{AppState, build_edubot};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use edubot_core::RequestContext;
use edubot_core::types::io::{ChatInput, ChatReply, MessageInput, MessageReply};
use tracing::error;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/message", post(post_message))
        .route("/chat", post(post_chat))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/message",
    request_body = MessageInput,
    responses((status = 200, body = MessageReply))
)]
pub(crate) async fn post_message(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Json(input): Json<MessageInput>,
) -> Response {
    let correlation_id = correlation.0.clone();
    // The model call can block for seconds; keep it off the accept loop.
    let result = tokio::task::spawn_blocking(move || {
        let edubot = build_edubot(&state)?;
        let ctx = RequestContext::new(Some(correlation.0));
        edubot.messages().handle(&ctx, input)
    })
    .await;
    match result {
        Ok(Ok(reply)) => Json(reply).into_response(),
        Ok(Err(err)) => map_error(&err, Some(correlation_id)).into_response(),
        Err(err) => {
            error!(error = %err, "message pipeline panicked");
            internal_error(Some(correlation_id)).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatInput,
    responses((status = 200, body = ChatReply))
)]
pub(crate) async fn post_chat(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Json(input): Json<ChatInput>,
) -> Response {
    let edubot = match build_edubot(&state) {
        Ok(edubot) => edubot,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    Json(edubot.messages().chat(input)).into_response()
}

use crate::routes::logs::LogsQuery;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use edubot_core::types::io::{
    ChatInput, ChatReply, MessageInput, MessageReply, Resolution, TramiteInput, TramiteReceipt,
};
use edubot_core::types::tramite::{NewTramite, Tramite};
use edubot_events::types::{Event, EventType, NewEvent};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::messages::post_message,
        crate::routes::messages::post_chat,
        crate::routes::tramites::create_tramite,
        crate::routes::tramites::list_tramites,
        crate::routes::logs::list_logs,
        crate::routes::documents::download,
    ),
    components(schemas(
        MessageInput,
        MessageReply,
        ChatInput,
        ChatReply,
        Resolution,
        TramiteInput,
        TramiteReceipt,
        Tramite,
        NewTramite,
        Event,
        NewEvent,
        EventType,
        LogsQuery,
    ))
)]
pub struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

pub(crate) async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

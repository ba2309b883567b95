use axum::Json;
use axum::http::StatusCode;
use edubot_core::error::{EdubotError, EventError, InferenceError, TramiteError};
use serde::Serialize;

/// Failure body for every route. `ok` is always false so clients that only
/// check the flag read failures correctly.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub code: &'static str,
    pub error: String,
    pub correlation_id: Option<String>,
}

const INTERNAL_MESSAGE: &str = "error interno del servidor";

pub fn map_error(
    err: &EdubotError,
    correlation_id: Option<String>,
) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code, error) = match err {
        EdubotError::Tramite(tramite) => map_tramite_error(tramite),
        EdubotError::Inference(inference) => map_inference_error(inference),
        EdubotError::Event(EventError::Storage { .. })
        | EdubotError::Render(_)
        | EdubotError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            INTERNAL_MESSAGE.to_string(),
        ),
    };

    (
        status,
        Json(ErrorEnvelope {
            ok: false,
            code,
            error,
            correlation_id,
        }),
    )
}

pub fn internal_error(correlation_id: Option<String>) -> (StatusCode, Json<ErrorEnvelope>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope {
            ok: false,
            code: "internal_error",
            error: INTERNAL_MESSAGE.to_string(),
            correlation_id,
        }),
    )
}

fn map_tramite_error(err: &TramiteError) -> (StatusCode, &'static str, String) {
    match err {
        TramiteError::MissingFields { .. } | TramiteError::ReservedKey { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        TramiteError::NotFound => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
        TramiteError::Storage { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

// Inference failures degrade inside the pipeline and normally never reach a
// response; mapped anyway so the envelope stays total.
fn map_inference_error(err: &InferenceError) -> (StatusCode, &'static str, String) {
    match err {
        InferenceError::Timeout => (
            StatusCode::GATEWAY_TIMEOUT,
            "timeout",
            "el asistente tardó demasiado en responder".to_string(),
        ),
        InferenceError::Unavailable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "model_unavailable",
            "el asistente no está disponible en este momento".to_string(),
        ),
        InferenceError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

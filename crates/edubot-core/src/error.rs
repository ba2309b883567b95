use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("event store failure: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum TramiteError {
    #[error("faltan campos: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },
    #[error("campo reservado en extra: {key}")]
    ReservedKey { key: String },
    #[error("tramite not found")]
    NotFound,
    #[error("tramite store failure: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model call timed out")]
    Timeout,
    #[error("model unavailable: {message}")]
    Unavailable { message: String },
    #[error("model call failed: {message}")]
    Internal { message: String },
}

#[derive(Debug, Error)]
pub enum EdubotError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Tramite(#[from] TramiteError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Render(#[from] edubot_pdf::RenderError),
    #[error("internal error: {message}")]
    Internal { message: String },
}

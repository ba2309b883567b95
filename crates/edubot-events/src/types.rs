use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_CHANNEL: &str = "web";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MessageSent,
    MessageReceived,
    TramiteSubmitted,
    InferenceQuestion,
    InferenceAnswer,
}

/// Audit record of a chat exchange or submission action. Append-only;
/// `timestamp` is milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i64,
    pub event_type: EventType,
    pub intent: Option<String>,
    pub text: Option<String>,
    pub channel: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewEvent {
    pub event_type: EventType,
    pub intent: Option<String>,
    pub text: Option<String>,
    pub channel: Option<String>,
}

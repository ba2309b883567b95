use crate::routes::error::map_error;
use crate::{AppState, build_edubot};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use edubot_events::types::Event;
use tokio::sync::broadcast;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, serde::Deserialize, ToSchema, IntoParams)]
pub struct LogsQuery {
    limit: Option<u32>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/logs", get(list_logs))
        .route("/logs/stream", get(stream_logs))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogsQuery),
    responses((status = 200, body = Vec<Event>))
)]
pub(crate) async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Response {
    let edubot = match build_edubot(&state) {
        Ok(edubot) => edubot,
        Err(err) => return map_error(&err, None).into_response(),
    };
    match edubot.events().list(query.limit) {
        Ok(events) => Json(events).into_response(),
        Err(err) => map_error(&err, None).into_response(),
    }
}

pub(crate) async fn stream_logs(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(mut socket: WebSocket, state: AppState) {
    let mut receiver = state.event_bus.subscribe();
    while let Some(frame) = next_frame(&mut receiver).await {
        if socket.send(Message::Text(frame.into())).await.is_err() {
            break;
        }
    }
}

/// A lagged receiver skips the overwritten frames and keeps streaming; only
/// a closed bus ends the stream.
async fn next_frame(receiver: &mut broadcast::Receiver<Event>) -> Option<String> {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                return Some(serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string()));
            }
            Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edubot_events::bus::EventBus;
    use edubot_events::types::EventType;

    fn event(id: i64) -> Event {
        Event {
            id,
            event_type: EventType::MessageSent,
            intent: None,
            text: None,
            channel: "web".to_string(),
            timestamp: id,
        }
    }

    #[tokio::test]
    async fn lagged_receiver_skips_missed_frames_and_keeps_streaming() {
        let bus = EventBus::new(2);
        let mut receiver = bus.subscribe();
        for id in 0..5 {
            bus.publish(event(id)).unwrap();
        }
        // Only the two newest frames survive the overflow.
        let frame = next_frame(&mut receiver).await.unwrap();
        assert!(frame.contains("\"id\":3"));
        let frame = next_frame(&mut receiver).await.unwrap();
        assert!(frame.contains("\"id\":4"));
    }

    #[tokio::test]
    async fn closed_bus_ends_the_stream() {
        let bus = EventBus::new(2);
        let mut receiver = bus.subscribe();
        bus.publish(event(1)).unwrap();
        drop(bus);
        assert!(next_frame(&mut receiver).await.is_some());
        assert!(next_frame(&mut receiver).await.is_none());
    }
}

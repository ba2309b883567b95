use crate::util::{decode_enum, encode_enum};
use edubot_core::error::EventError;
use edubot_core::events::EventRepository;
use edubot_events::types::{DEFAULT_CHANNEL, Event, NewEvent};
use rusqlite::Connection;

pub const LIST_CAP: u32 = 1000;

pub struct EventRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> EventRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for EventRepo<'_> {
    fn append(&self, event: NewEvent) -> Result<Event, EventError> {
        let channel = event
            .channel
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
        let timestamp = chrono::Utc::now().timestamp_millis();
        let event_type = encode_enum(&event.event_type).map_err(|err| EventError::Storage {
            message: err.to_string(),
        })?;
        let sql = "INSERT INTO events (event_type, intent, text, channel, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)";
        let params = (
            event_type,
            event.intent.clone(),
            event.text.clone(),
            channel.clone(),
            timestamp,
        );
        self.conn
            .execute(sql, params)
            .map_err(|err| EventError::Storage {
                message: err.to_string(),
            })?;
        Ok(Event {
            id: self.conn.last_insert_rowid(),
            event_type: event.event_type,
            intent: event.intent,
            text: event.text,
            channel,
            timestamp,
        })
    }

    fn list(&self, limit: Option<u32>) -> Result<Vec<Event>, EventError> {
        let limit = limit.unwrap_or(LIST_CAP).min(LIST_CAP);
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, event_type, intent, text, channel, timestamp FROM events \
                 ORDER BY timestamp DESC, id DESC LIMIT ?1",
            )
            .map_err(|err| EventError::Storage {
                message: err.to_string(),
            })?;
        let mut rows = stmt
            .query(rusqlite::params![limit])
            .map_err(|err| EventError::Storage {
                message: err.to_string(),
            })?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().map_err(|err| EventError::Storage {
            message: err.to_string(),
        })? {
            events.push(map_event_row(row)?);
        }
        Ok(events)
    }
}

fn map_event_row(row: &rusqlite::Row<'_>) -> Result<Event, EventError> {
    let id: i64 = row.get(0).map_err(|err| EventError::Storage {
        message: err.to_string(),
    })?;
    let event_type: String = row.get(1).map_err(|err| EventError::Storage {
        message: err.to_string(),
    })?;
    let intent: Option<String> = row.get(2).map_err(|err| EventError::Storage {
        message: err.to_string(),
    })?;
    let text: Option<String> = row.get(3).map_err(|err| EventError::Storage {
        message: err.to_string(),
    })?;
    let channel: String = row.get(4).map_err(|err| EventError::Storage {
        message: err.to_string(),
    })?;
    let timestamp: i64 = row.get(5).map_err(|err| EventError::Storage {
        message: err.to_string(),
    })?;

    Ok(Event {
        id,
        event_type: decode_enum(&event_type).map_err(|err| EventError::Storage {
            message: err.to_string(),
        })?,
        intent,
        text,
        channel,
        timestamp,
    })
}

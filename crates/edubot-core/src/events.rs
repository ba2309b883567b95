use crate::error::EventError;
use edubot_events::types::{Event, NewEvent};

pub trait EventRepository {
    fn append(&self, event: NewEvent) -> Result<Event, EventError>;
    fn list(&self, limit: Option<u32>) -> Result<Vec<Event>, EventError>;
}

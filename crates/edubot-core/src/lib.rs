pub mod edubot;
pub mod error;
pub mod events;
pub mod inference;
pub mod intents;
pub mod store;
pub mod tramites;
pub mod validation;

pub mod types;

pub use crate::edubot::{Edubot, RequestContext};
pub use crate::error::EdubotError;
pub use crate::store::Store;

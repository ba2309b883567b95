pub mod event_repo;
pub mod schema;
pub mod store;
pub mod tramite_repo;
pub mod util;

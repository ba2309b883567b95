use edubot_core::store::Store;
use rusqlite::Connection;

use crate::event_repo::EventRepo;
use crate::tramite_repo::TramiteRepo;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for DbStore {
    type Events<'a>
        = EventRepo<'a>
    where
        Self: 'a;
    type Tramites<'a>
        = TramiteRepo<'a>
    where
        Self: 'a;

    fn events(&self) -> Self::Events<'_> {
        EventRepo::new(&self.conn)
    }

    fn tramites(&self) -> Self::Tramites<'_> {
        TramiteRepo::new(&self.conn)
    }
}

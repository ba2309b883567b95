use crate::error::TramiteError;
use crate::types::tramite::{NewTramite, Tramite};

pub trait TramiteRepository {
    fn insert(&self, tramite: NewTramite) -> Result<Tramite, TramiteError>;
    fn list(&self) -> Result<Vec<Tramite>, TramiteError>;
    fn get(&self, id: i64) -> Result<Option<Tramite>, TramiteError>;
}

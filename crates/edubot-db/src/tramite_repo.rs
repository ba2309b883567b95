use crate::util::{decode_json, encode_json};
use edubot_core::error::TramiteError;
use edubot_core::tramites::TramiteRepository;
use edubot_core::types::tramite::{NewTramite, Tramite};
use rusqlite::Connection;

pub struct TramiteRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> TramiteRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl TramiteRepository for TramiteRepo<'_> {
    fn insert(&self, tramite: NewTramite) -> Result<Tramite, TramiteError> {
        let created_at = chrono::Utc::now().timestamp();
        let extra_json = encode_json(&tramite.extra).map_err(|err| TramiteError::Storage {
            message: err.to_string(),
        })?;
        let sql = "INSERT INTO tramites (tipo, nombre, grado, extra_json, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
        let params = (
            tramite.tipo.clone(),
            tramite.nombre.clone(),
            tramite.grado.clone(),
            extra_json,
            created_at,
        );
        self.conn
            .execute(sql, params)
            .map_err(|err| TramiteError::Storage {
                message: err.to_string(),
            })?;
        Ok(Tramite {
            id: self.conn.last_insert_rowid(),
            tipo: tramite.tipo,
            nombre: tramite.nombre,
            grado: tramite.grado,
            extra: tramite.extra,
            created_at,
        })
    }

    fn list(&self) -> Result<Vec<Tramite>, TramiteError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, tipo, nombre, grado, extra_json, created_at FROM tramites \
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(|err| TramiteError::Storage {
                message: err.to_string(),
            })?;
        let mut rows = stmt.query([]).map_err(|err| TramiteError::Storage {
            message: err.to_string(),
        })?;
        let mut tramites = Vec::new();
        while let Some(row) = rows.next().map_err(|err| TramiteError::Storage {
            message: err.to_string(),
        })? {
            tramites.push(map_tramite_row(row)?);
        }
        Ok(tramites)
    }

    fn get(&self, id: i64) -> Result<Option<Tramite>, TramiteError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, tipo, nombre, grado, extra_json, created_at FROM tramites WHERE id = ?1")
            .map_err(|err| TramiteError::Storage {
                message: err.to_string(),
            })?;
        let mut rows = stmt
            .query(rusqlite::params![id])
            .map_err(|err| TramiteError::Storage {
                message: err.to_string(),
            })?;
        let Some(row) = rows.next().map_err(|err| TramiteError::Storage {
            message: err.to_string(),
        })?
        else {
            return Ok(None);
        };
        Ok(Some(map_tramite_row(row)?))
    }
}

fn map_tramite_row(row: &rusqlite::Row<'_>) -> Result<Tramite, TramiteError> {
    let id: i64 = row.get(0).map_err(|err| TramiteError::Storage {
        message: err.to_string(),
    })?;
    let tipo: String = row.get(1).map_err(|err| TramiteError::Storage {
        message: err.to_string(),
    })?;
    let nombre: String = row.get(2).map_err(|err| TramiteError::Storage {
        message: err.to_string(),
    })?;
    let grado: String = row.get(3).map_err(|err| TramiteError::Storage {
        message: err.to_string(),
    })?;
    let extra_json: String = row.get(4).map_err(|err| TramiteError::Storage {
        message: err.to_string(),
    })?;
    let created_at: i64 = row.get(5).map_err(|err| TramiteError::Storage {
        message: err.to_string(),
    })?;

    Ok(Tramite {
        id,
        tipo,
        nombre,
        grado,
        extra: decode_json(&extra_json).map_err(|err| TramiteError::Storage {
            message: err.to_string(),
        })?,
        created_at,
    })
}

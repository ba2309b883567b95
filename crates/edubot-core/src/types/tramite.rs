use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A structured administrative form request. Immutable once created;
/// `created_at` is seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tramite {
    pub id: i64,
    pub tipo: String,
    pub nombre: String,
    pub grado: String,
    pub extra: BTreeMap<String, Value>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewTramite {
    pub tipo: String,
    pub nombre: String,
    pub grado: String,
    pub extra: BTreeMap<String, Value>,
}

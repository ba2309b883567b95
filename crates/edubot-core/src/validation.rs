use crate::error::TramiteError;
use crate::types::io::TramiteInput;
use crate::types::tramite::NewTramite;

pub const RESERVED_KEYS: &[&str] = &["tipo", "nombre", "grado"];

/// Checks the required fields and the reserved-key invariant, returning the
/// normalized record to persist. Nothing is persisted on failure.
pub fn validate_tramite(input: TramiteInput) -> Result<NewTramite, TramiteError> {
    let mut missing = Vec::new();
    let tipo = required_field(&input.tipo, "tipo", &mut missing);
    let nombre = required_field(&input.nombre, "nombre", &mut missing);
    let grado = required_field(&input.grado, "grado", &mut missing);
    if !missing.is_empty() {
        return Err(TramiteError::MissingFields { fields: missing });
    }

    for key in RESERVED_KEYS {
        if input.extra.contains_key(*key) {
            return Err(TramiteError::ReservedKey {
                key: (*key).to_string(),
            });
        }
    }

    Ok(NewTramite {
        tipo,
        nombre,
        grado,
        extra: input.extra,
    })
}

fn required_field(value: &Option<String>, name: &str, missing: &mut Vec<String>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn input(tipo: Option<&str>, nombre: Option<&str>, grado: Option<&str>) -> TramiteInput {
        TramiteInput {
            tipo: tipo.map(String::from),
            nombre: nombre.map(String::from),
            grado: grado.map(String::from),
            channel: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn accepts_complete_input() {
        let tramite = validate_tramite(input(Some("constancia"), Some("Ana"), Some("5to"))).unwrap();
        assert_eq!(tramite.tipo, "constancia");
        assert_eq!(tramite.nombre, "Ana");
        assert_eq!(tramite.grado, "5to");
    }

    #[test]
    fn names_every_missing_field() {
        let err = validate_tramite(input(None, Some(""), Some("5to"))).unwrap_err();
        match err {
            TramiteError::MissingFields { fields } => {
                assert_eq!(fields, vec!["tipo".to_string(), "nombre".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_reserved_extra_keys() {
        let mut tramite = input(Some("constancia"), Some("Ana"), Some("5to"));
        tramite
            .extra
            .insert("grado".to_string(), serde_json::json!("6to"));
        let err = validate_tramite(tramite).unwrap_err();
        assert!(matches!(err, TramiteError::ReservedKey { .. }));
    }
}

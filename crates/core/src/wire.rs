//! Wire-format parsing for parameter records.
//!
//! Records arrive as JSON (REST API, CLI) or YAML (CLI). Parsing uses `serde_path_to_error` so a
//! schema mismatch names the failing path (e.g. `st_deviation.V1`) instead of only a line number.
//! Parsing checks shape only; ranges and vocabularies are checked by
//! [`crate::validation::validate`].

use crate::record::RawEcgRecord;
use crate::{EcgError, EcgResult};
use serde::de::DeserializeOwned;

fn schema_error<E: std::fmt::Display>(what: &str, err: serde_path_to_error::Error<E>) -> EcgError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    EcgError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}

fn from_json<T: DeserializeOwned>(what: &str, json_text: &str) -> EcgResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| schema_error(what, err))?;
    deserializer
        .end()
        .map_err(|e| EcgError::Translation(format!("{what}: trailing characters: {e}")))?;
    Ok(value)
}

/// Parse one record from JSON text.
///
/// # Errors
///
/// Returns [`EcgError::Translation`] if the JSON does not match the record schema, including
/// unknown keys.
pub fn parse_record_json(json_text: &str) -> EcgResult<RawEcgRecord> {
    from_json("ECG record", json_text)
}

/// Parse a JSON array of records.
pub fn parse_records_json(json_text: &str) -> EcgResult<Vec<RawEcgRecord>> {
    from_json("ECG record batch", json_text)
}

/// Parse one record from YAML text.
///
/// # Errors
///
/// Returns [`EcgError::Translation`] if the YAML does not match the record schema, including
/// unknown keys.
pub fn parse_record_yaml(yaml_text: &str) -> EcgResult<RawEcgRecord> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    serde_path_to_error::deserialize(deserializer).map_err(|err| schema_error("ECG record", err))
}

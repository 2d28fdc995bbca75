//! Schema-checked JSON decoding for wire structs.
//!
//! Field names are checked against an explicit allow-list before the
//! payload is handed to serde, so an unrecognised key is always rejected
//! no matter how the target type is annotated.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::DecodeError;

/// Decode `bytes` into `T`, rejecting keys outside `fields`.
pub fn decode_strict<T: DeserializeOwned>(bytes: &[u8], fields: &[&str]) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    if let Some(field) = object.keys().find(|key| !fields.contains(&key.as_str())) {
        return Err(DecodeError::UnknownField {
            field: field.clone(),
        });
    }

    Ok(serde_json::from_value(value)?)
}

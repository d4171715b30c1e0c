//! Helpers for the raw-document validators generated per model.
//!
//! Typed decoding cannot tell an absent key from an explicit `null`, so generated
//! `validate_*_json` functions run these checks against the decoded [`Value`] first.

use serde_json::{Map, Value};

use crate::RequestError;

pub type Validator = fn(&Value) -> Result<(), RequestError>;

pub fn as_object(value: &Value) -> Result<&Map<String, Value>, RequestError> {
  value.as_object().ok_or(RequestError::InvalidDocument("object"))
}

pub fn as_array(value: &Value) -> Result<&[Value], RequestError> {
  value
    .as_array()
    .map(Vec::as_slice)
    .ok_or(RequestError::InvalidDocument("array"))
}

/// Checks that every required key is present, and non-null unless listed as nullable.
pub fn check_required(
  object: &Map<String, Value>,
  required: &[&'static str],
  nullable: &[&'static str],
) -> Result<(), RequestError> {
  for &field in required {
    match object.get(field) {
      None => return Err(RequestError::MissingField(field)),
      Some(Value::Null) if !nullable.contains(&field) => return Err(RequestError::NullNotAllowed(field)),
      Some(_) => {}
    }
  }
  Ok(())
}

/// Runs a nested validator on a field when it is present and not null.
pub fn check_field(object: &Map<String, Value>, field: &'static str, validator: Validator) -> Result<(), RequestError> {
  match object.get(field) {
    None | Some(Value::Null) => Ok(()),
    Some(value) => validator(value).map_err(|source| RequestError::wrap_field(field, source)),
  }
}

/// Runs the element validator on every element, tracking the index.
///
/// Elements are typed without `Option`, so a `null` element is handed to the validator too and
/// rejected there with its index.
pub fn check_elements(value: &Value, validator: Validator) -> Result<(), RequestError> {
  as_array(value)?
    .iter()
    .enumerate()
    .try_for_each(|(index, element)| validator(element).map_err(|source| RequestError::wrap_element(index, source)))
}

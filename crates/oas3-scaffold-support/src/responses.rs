use axum::{
  body::Body,
  http::{HeaderName, HeaderValue, StatusCode, header},
  response::Response,
};
use serde::Serialize;
use serde_json::Value;

use crate::ResponseError;

/// Encodes a header model as string pairs.
///
/// The model goes through the JSON codec first; absent values are dropped and every
/// remaining scalar is rendered as text because header transport is string-only.
pub fn header_pairs<T: Serialize>(headers: &T) -> Result<Vec<(String, String)>, ResponseError> {
  let Value::Object(object) = serde_json::to_value(headers)? else {
    return Err(ResponseError::HeaderShape);
  };
  Ok(
    object
      .into_iter()
      .filter_map(|(name, value)| match value {
        Value::Null => None,
        Value::String(text) => Some((name, text)),
        other => Some((name, other.to_string())),
      })
      .collect(),
  )
}

/// Writes headers, then the JSON body, then the status line.
pub fn json_response<T: Serialize>(
  status: u16,
  headers: Vec<(String, String)>,
  body: &T,
) -> Result<Response, ResponseError> {
  let payload = serde_json::to_vec(body)?;
  let builder = with_headers(Response::builder(), headers)?.header(header::CONTENT_TYPE, "application/json");
  Ok(builder.status(status_code(status)?).body(Body::from(payload))?)
}

pub fn empty_response(status: u16, headers: Vec<(String, String)>) -> Result<Response, ResponseError> {
  let builder = with_headers(Response::builder(), headers)?;
  Ok(builder.status(status_code(status)?).body(Body::empty())?)
}

fn with_headers(
  mut builder: http::response::Builder,
  headers: Vec<(String, String)>,
) -> Result<http::response::Builder, ResponseError> {
  for (name, value) in headers {
    let header_name = HeaderName::try_from(name.as_str()).map_err(|error| ResponseError::HeaderEncoding {
      name: name.clone(),
      message: error.to_string(),
    })?;
    let header_value = HeaderValue::try_from(value).map_err(|error| ResponseError::HeaderEncoding {
      name: name.clone(),
      message: error.to_string(),
    })?;
    builder = builder.header(header_name, header_value);
  }
  Ok(builder)
}

fn status_code(status: u16) -> Result<StatusCode, ResponseError> {
  StatusCode::from_u16(status).map_err(|_| ResponseError::UnknownResponseVariant(status))
}

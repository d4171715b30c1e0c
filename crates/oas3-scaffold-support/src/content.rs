use std::fmt;

use axum::{
  body::{Body, to_bytes},
  http::{HeaderMap, Method, Uri, header},
};
use mediatype::{
  MediaType,
  names::{APPLICATION, JSON},
};
use serde_json::Value;

use crate::RequestError;

/// Accepts `application/json` (with any parameters) and a missing `Content-Type` header.
pub fn negotiate_json(headers: &HeaderMap) -> Result<(), RequestError> {
  let Some(value) = headers.get(header::CONTENT_TYPE) else {
    return Ok(());
  };
  let raw = value.to_str().map_err(|_| RequestError::UnsupportedMediaType)?;
  if raw.trim().is_empty() {
    return Ok(());
  }
  match MediaType::parse(raw) {
    Ok(media) if media.ty == APPLICATION && media.subty == JSON && media.suffix.is_none() => Ok(()),
    _ => Err(RequestError::UnsupportedMediaType),
  }
}

/// Reads the whole body as a JSON document.
pub async fn read_json(body: Body) -> Result<Value, RequestError> {
  read_optional_json(body)
    .await?
    .ok_or(RequestError::InvalidDocument("body"))
}

/// Reads the body as a JSON document, mapping an empty payload to `None`.
///
/// The body is read to its end; size limits are applied by the caller through
/// `RequestExt::with_limited_body`, which honors the router's `DefaultBodyLimit`.
pub async fn read_optional_json(body: Body) -> Result<Option<Value>, RequestError> {
  let bytes = to_bytes(body, usize::MAX).await?;
  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(None);
  }
  Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Request metadata handed to business logic next to the typed request.
#[derive(Debug, Clone)]
pub struct RequestContext {
  pub method: Method,
  pub uri: Uri,
  pub extensions: http::Extensions,
}

impl RequestContext {
  #[must_use]
  pub fn from_parts(parts: http::request::Parts) -> Self {
    Self {
      method: parts.method,
      uri: parts.uri,
      extensions: parts.extensions,
    }
  }
}

impl fmt::Display for RequestContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.method, self.uri)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn with_content_type(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
    headers
  }

  #[test]
  fn test_negotiation() {
    assert!(negotiate_json(&HeaderMap::new()).is_ok());
    assert!(negotiate_json(&with_content_type("application/json")).is_ok());
    assert!(negotiate_json(&with_content_type("application/json; charset=utf-8")).is_ok());
    assert!(matches!(
      negotiate_json(&with_content_type("text/plain")),
      Err(RequestError::UnsupportedMediaType)
    ));
    assert!(negotiate_json(&with_content_type("application/problem+json")).is_err());
  }

  #[tokio::test]
  async fn test_optional_body() {
    assert!(read_optional_json(Body::empty()).await.unwrap().is_none());
    let value = read_optional_json(Body::from(r#"{"name":"value"}"#)).await.unwrap();
    assert_eq!(value, Some(serde_json::json!({ "name": "value" })));
    assert!(read_json(Body::from("not json")).await.is_err());
    assert!(matches!(
      read_json(Body::empty()).await,
      Err(RequestError::InvalidDocument("body"))
    ));
  }
}

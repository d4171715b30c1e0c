use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::json;

/// Failures raised while turning an incoming request into a typed request contract.
///
/// Every variant is recovered per request and answered with a client fault carrying the
/// error message.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
  #[error("{location} parameter {name} is required")]
  MissingParameter { location: &'static str, name: &'static str },
  #[error("{location} parameter {name} is not valid: {message}")]
  InvalidParameter {
    location: &'static str,
    name: &'static str,
    message: String,
  },
  #[error("{name} is not a valid date-time format")]
  InvalidDateTimeFormat {
    name: &'static str,
    #[source]
    source: chrono::ParseError,
  },
  #[error("field {0} is required")]
  MissingField(&'static str),
  #[error("field {0} cannot be null")]
  NullNotAllowed(&'static str),
  #[error("field {field} is not valid: {source}")]
  InvalidField {
    field: &'static str,
    #[source]
    source: Box<RequestError>,
  },
  #[error("error validating object at index {index}: {source}")]
  InvalidElement {
    index: usize,
    #[source]
    source: Box<RequestError>,
  },
  #[error("expected a JSON {0}")]
  InvalidDocument(&'static str),
  #[error("Unsupported Content-Type")]
  UnsupportedMediaType,
  #[error("failed to read request body: {0}")]
  BodyRead(String),
  #[error("request body exceeds the configured limit")]
  PayloadTooLarge,
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Validation(#[from] validator::ValidationErrors),
}

impl RequestError {
  #[must_use]
  pub fn status(&self) -> StatusCode {
    match self {
      Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
      _ => StatusCode::BAD_REQUEST,
    }
  }

  #[must_use]
  pub fn wrap_field(field: &'static str, source: Self) -> Self {
    Self::InvalidField {
      field,
      source: Box::new(source),
    }
  }

  #[must_use]
  pub fn wrap_element(index: usize, source: Self) -> Self {
    Self::InvalidElement {
      index,
      source: Box::new(source),
    }
  }
}

impl From<axum::Error> for RequestError {
  fn from(error: axum::Error) -> Self {
    let inner = match error.into_inner().downcast::<axum::Error>() {
      Ok(nested) => nested.into_inner(),
      Err(inner) => inner,
    };
    if inner.is::<LengthLimitError>() {
      Self::PayloadTooLarge
    } else {
      Self::BodyRead(inner.to_string())
    }
  }
}

/// Failures raised while writing a response envelope back to the client.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
  #[error("response slot for status {0} is not set")]
  UnknownResponseVariant(u16),
  #[error("header {name} cannot be encoded: {message}")]
  HeaderEncoding { name: String, message: String },
  #[error("response headers must serialize to an object")]
  HeaderShape,
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Http(#[from] http::Error),
}

/// Answers a request that failed to parse, carrying the error text.
#[must_use]
pub fn client_fault(error: &RequestError) -> Response {
  error_response(error.status(), &error.to_string())
}

/// Answers a request whose handler failed, without leaking internal details.
#[must_use]
pub fn server_fault() -> Response {
  error_response(StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError")
}

fn error_response(status: StatusCode, message: &str) -> Response {
  let body = json!({ "error": message }).to_string();
  (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

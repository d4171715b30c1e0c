//! Runtime support for service scaffolds generated by `oas3-scaffold`.
//!
//! Generated handler units import this crate for request parsing, rule evaluation,
//! raw-document validation and response writing.

pub mod content;
pub mod deep;
pub mod errors;
pub mod params;
pub mod responses;
pub mod rules;

pub use anyhow;
pub use content::{RequestContext, negotiate_json, read_json, read_optional_json};
pub use errors::{RequestError, ResponseError, client_fault, server_fault};
pub use futures::future::BoxFuture;
pub use params::{ParamSource, parse_timestamp};
pub use responses::{empty_response, header_pairs, json_response};
pub use rules::{Inspect, Report, Rule, Subject, check_value};
pub use serde_json;
pub use validator::{Validate, ValidationErrors};

/// Date-time values declared with `format: date-time`, kept with their original offset.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

/// Decodes a validated raw document into its typed model.
pub fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, RequestError> {
  Ok(serde_json::from_value(value)?)
}

/// Boxes a handler future, for implementations of generated handler traits.
pub fn boxed<'a, T>(future: impl Future<Output = anyhow::Result<T>> + Send + 'a) -> BoxFuture<'a, anyhow::Result<T>> {
  Box::pin(future)
}

use std::{collections::HashMap, str::FromStr};

use axum::{
  extract::{FromRequestParts, Path, Query},
  http::{HeaderMap, Uri, header, request::Parts},
};

use crate::{RequestError, Timestamp};

pub const PATH: &str = "path";
pub const QUERY: &str = "query";
pub const HEADER: &str = "header";
pub const COOKIE: &str = "cookie";

/// Single-valued parameters of one location, looked up by name.
#[derive(Debug, Default, Clone)]
pub struct ParamSource {
  location: &'static str,
  values: HashMap<String, String>,
}

impl ParamSource {
  /// Captures the route-matched path segments.
  pub async fn path(parts: &mut Parts) -> Result<Self, RequestError> {
    let Path(values) = Path::<HashMap<String, String>>::from_request_parts(parts, &())
      .await
      .map_err(|rejection| RequestError::InvalidParameter {
        location: PATH,
        name: "*",
        message: rejection.body_text(),
      })?;
    Ok(Self { location: PATH, values })
  }

  pub fn query(uri: &Uri) -> Result<Self, RequestError> {
    let Query(values) =
      Query::<HashMap<String, String>>::try_from_uri(uri).map_err(|rejection| RequestError::InvalidParameter {
        location: QUERY,
        name: "*",
        message: rejection.body_text(),
      })?;
    Ok(Self { location: QUERY, values })
  }

  /// Header names are matched case-insensitively; values that are not visible ASCII are ignored.
  #[must_use]
  pub fn headers(headers: &HeaderMap) -> Self {
    let values = headers
      .iter()
      .filter_map(|(name, value)| Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned())))
      .fold(HashMap::new(), |mut acc, (name, value)| {
        acc.entry(name).or_insert(value);
        acc
      });
    Self {
      location: HEADER,
      values,
    }
  }

  /// Collects the cookie jar from every `Cookie` header; the first occurrence of a name wins.
  #[must_use]
  pub fn cookies(headers: &HeaderMap) -> Self {
    let mut values = HashMap::new();
    let pairs = headers
      .get_all(header::COOKIE)
      .iter()
      .filter_map(|value| value.to_str().ok())
      .flat_map(|value| value.split(';'))
      .filter_map(|pair| pair.split_once('='));
    for (name, value) in pairs {
      values
        .entry(name.trim().to_owned())
        .or_insert_with(|| value.trim().trim_matches('"').to_owned());
    }
    Self {
      location: COOKIE,
      values,
    }
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&str> {
    if self.location == HEADER {
      return self.values.get(&name.to_ascii_lowercase()).map(String::as_str);
    }
    self.values.get(name).map(String::as_str)
  }

  pub fn require(&self, name: &'static str) -> Result<&str, RequestError> {
    self.get(name).ok_or(RequestError::MissingParameter {
      location: self.location,
      name,
    })
  }

  /// Converts a raw value with [`FromStr`], reporting the parameter on failure.
  pub fn parse<T>(&self, name: &'static str, raw: &str) -> Result<T, RequestError>
  where
    T: FromStr,
    T::Err: std::fmt::Display,
  {
    raw.parse().map_err(|error: T::Err| RequestError::InvalidParameter {
      location: self.location,
      name,
      message: error.to_string(),
    })
  }
}

/// Parses an RFC 3339 timestamp parameter.
pub fn parse_timestamp(name: &'static str, raw: &str) -> Result<Timestamp, RequestError> {
  Timestamp::parse_from_rfc3339(raw).map_err(|source| RequestError::InvalidDateTimeFormat { name, source })
}

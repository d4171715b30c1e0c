//! Evaluation of the per-field rule lists emitted next to every generated model.
//!
//! A generated model implements [`validator::Validate`] by handing each field to a [`Report`]
//! together with a static slice of [`Rule`]s. Rules are checked in order; a [`Rule::Dive`]
//! applies every rule after it to each element of a list instead of the list itself.

use std::{
  borrow::Cow,
  collections::HashSet,
  net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
  Required,
  OmitIfAbsent,
  LengthMin(u64),
  LengthMax(u64),
  Min(f64),
  Max(f64),
  OneOf(&'static [&'static str]),
  Email,
  Ip,
  Ipv4,
  Ipv6,
  ItemsMin(u64),
  ItemsMax(u64),
  Unique,
  Dive,
}

/// A borrowed view of a field value, as seen by the rule evaluator.
pub enum Subject<'a> {
  Absent,
  Text(&'a str),
  Int(i64),
  Float(f64),
  Bool(bool),
  List(Vec<Subject<'a>>),
  Model(&'a dyn Validate),
}

pub trait Inspect {
  fn inspect(&self) -> Subject<'_>;
}

impl Inspect for String {
  fn inspect(&self) -> Subject<'_> {
    Subject::Text(self)
  }
}

impl Inspect for i64 {
  fn inspect(&self) -> Subject<'_> {
    Subject::Int(*self)
  }
}

impl Inspect for i32 {
  fn inspect(&self) -> Subject<'_> {
    Subject::Int(i64::from(*self))
  }
}

impl Inspect for f64 {
  fn inspect(&self) -> Subject<'_> {
    Subject::Float(*self)
  }
}

impl Inspect for bool {
  fn inspect(&self) -> Subject<'_> {
    Subject::Bool(*self)
  }
}

impl Inspect for Timestamp {
  fn inspect(&self) -> Subject<'_> {
    Subject::Int(self.timestamp())
  }
}

impl<T: Inspect> Inspect for Option<T> {
  fn inspect(&self) -> Subject<'_> {
    self.as_ref().map_or(Subject::Absent, Inspect::inspect)
  }
}

impl<T: Inspect> Inspect for Box<T> {
  fn inspect(&self) -> Subject<'_> {
    (**self).inspect()
  }
}

impl<T: Inspect> Inspect for Vec<T> {
  fn inspect(&self) -> Subject<'_> {
    Subject::List(self.iter().map(Inspect::inspect).collect())
  }
}

/// Accumulates rule failures for one model.
#[derive(Debug)]
pub struct Report {
  errors: ValidationErrors,
}

impl Default for Report {
  fn default() -> Self {
    Self::new()
  }
}

impl Report {
  #[must_use]
  pub fn new() -> Self {
    Self {
      errors: ValidationErrors::new(),
    }
  }

  pub fn field<T: Inspect + ?Sized>(&mut self, key: &'static str, value: &T, rules: &[Rule]) {
    let subject = value.inspect();
    if let Err(error) = check(&subject, rules) {
      self.errors.add(key, error);
    }
  }

  pub fn finish(self) -> Result<(), ValidationErrors> {
    if self.errors.errors().is_empty() {
      Ok(())
    } else {
      Err(self.errors)
    }
  }
}

/// Runs nested model validation on any value, without field rules.
pub fn check_value<T: Inspect + ?Sized>(value: &T) -> Result<(), ValidationErrors> {
  let mut report = Report::new();
  if let Err(error) = check(&value.inspect(), &[]) {
    report.errors.add("value", error);
  }
  report.finish()
}

fn check(subject: &Subject<'_>, rules: &[Rule]) -> Result<(), ValidationError> {
  for (position, rule) in rules.iter().enumerate() {
    match rule {
      Rule::Required if matches!(subject, Subject::Absent) => return Err(failure("required", "value is required")),
      Rule::OmitIfAbsent if matches!(subject, Subject::Absent) => return Ok(()),
      Rule::Dive => {
        let element_rules = &rules[position + 1..];
        if let Subject::List(items) = subject {
          for (index, item) in items.iter().enumerate() {
            check(item, element_rules)
              .map_err(|error| failure("dive", format!("element {index}: {}", describe(&error))))?;
          }
        }
        return Ok(());
      }
      _ => check_rule(subject, *rule)?,
    }
  }
  nested(subject)
}

fn check_rule(subject: &Subject<'_>, rule: Rule) -> Result<(), ValidationError> {
  match (rule, subject) {
    (Rule::LengthMin(min), Subject::Text(text)) if (text.chars().count() as u64) < min => {
      Err(failure("min", format!("length must be at least {min}")))
    }
    (Rule::LengthMax(max), Subject::Text(text)) if (text.chars().count() as u64) > max => {
      Err(failure("max", format!("length must be at most {max}")))
    }
    (Rule::Min(min), Subject::Int(value)) if (*value as f64) < min => {
      Err(failure("min", format!("value must be at least {min}")))
    }
    (Rule::Min(min), Subject::Float(value)) if *value < min => {
      Err(failure("min", format!("value must be at least {min}")))
    }
    (Rule::Max(max), Subject::Int(value)) if (*value as f64) > max => {
      Err(failure("max", format!("value must be at most {max}")))
    }
    (Rule::Max(max), Subject::Float(value)) if *value > max => {
      Err(failure("max", format!("value must be at most {max}")))
    }
    (Rule::OneOf(allowed), subject) => match literal(subject) {
      Some(text) if !allowed.contains(&text.as_ref()) => {
        Err(failure("oneof", format!("value must be one of [{}]", allowed.join(", "))))
      }
      _ => Ok(()),
    },
    (Rule::Email, Subject::Text(text)) if !text.validate_email() => Err(failure("email", "value is not an email")),
    (Rule::Ip, Subject::Text(text)) if text.parse::<IpAddr>().is_err() => {
      Err(failure("ip", "value is not an IP address"))
    }
    (Rule::Ipv4, Subject::Text(text)) if text.parse::<Ipv4Addr>().is_err() => {
      Err(failure("ipv4", "value is not an IPv4 address"))
    }
    (Rule::Ipv6, Subject::Text(text)) if text.parse::<Ipv6Addr>().is_err() => {
      Err(failure("ipv6", "value is not an IPv6 address"))
    }
    (Rule::ItemsMin(min), Subject::List(items)) if (items.len() as u64) < min => {
      Err(failure("min", format!("must contain at least {min} items")))
    }
    (Rule::ItemsMax(max), Subject::List(items)) if (items.len() as u64) > max => {
      Err(failure("max", format!("must contain at most {max} items")))
    }
    (Rule::Unique, Subject::List(items)) => {
      let mut seen = HashSet::new();
      let duplicated = items
        .iter()
        .filter_map(literal)
        .any(|text| !seen.insert(text.into_owned()));
      if duplicated {
        Err(failure("unique", "items must be unique"))
      } else {
        Ok(())
      }
    }
    _ => Ok(()),
  }
}

fn nested(subject: &Subject<'_>) -> Result<(), ValidationError> {
  match subject {
    Subject::Model(model) => model
      .validate()
      .map_err(|errors| failure("nested", errors.to_string())),
    Subject::List(items) => items.iter().enumerate().try_for_each(|(index, item)| {
      nested(item).map_err(|error| failure("nested", format!("element {index}: {}", describe(&error))))
    }),
    _ => Ok(()),
  }
}

fn literal<'a>(subject: &'a Subject<'_>) -> Option<Cow<'a, str>> {
  match subject {
    Subject::Text(text) => Some(Cow::Borrowed(*text)),
    Subject::Int(value) => Some(Cow::Owned(value.to_string())),
    Subject::Float(value) => Some(Cow::Owned(value.to_string())),
    Subject::Bool(value) => Some(Cow::Owned(value.to_string())),
    Subject::Absent | Subject::List(_) | Subject::Model(_) => None,
  }
}

fn describe(error: &ValidationError) -> String {
  error
    .message
    .as_ref()
    .map_or_else(|| error.code.to_string(), ToString::to_string)
}

fn failure(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
  let mut error = ValidationError::new(code);
  error.message = Some(message.into());
  error
}

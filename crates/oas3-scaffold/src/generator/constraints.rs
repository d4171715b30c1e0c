use std::{collections::BTreeSet, path::PathBuf};

use openapiv3::{ArrayType, Schema, SchemaKind, Type, VariantOrUnknownOrEmpty};

use crate::{
  generator::{
    ast::{FormatDirective, ValidationDirective},
    errors::GeneratorResult,
    metrics::GenerationWarning,
    resolve::{self, locate},
    schema::{SchemaNode, SchemaSource},
    session::Session,
  },
  utils::{refs::ComponentKind, spec::LoadedDocument},
};

/// How a field's presence is expressed in its directive list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
  Required,
  OmitIfAbsent,
  /// Required but nullable: typed as `Option<T>` and checked by deep validation only.
  Unconstrained,
}

impl Presence {
  pub(crate) fn for_field(required: bool, nullable: bool, required_as_optional: bool) -> Self {
    match (required, nullable) {
      (false, _) => Self::OmitIfAbsent,
      (true, _) if required_as_optional => Self::OmitIfAbsent,
      (true, false) => Self::Required,
      (true, true) => Self::Unconstrained,
    }
  }
}

/// Derives validation directives from schema constraints.
pub(crate) struct ConstraintSynthesizer<'s, 'a> {
  session: &'s mut Session<'a>,
  visiting: BTreeSet<(PathBuf, String)>,
}

impl<'s, 'a> ConstraintSynthesizer<'s, 'a> {
  pub(crate) fn new(session: &'s mut Session<'a>) -> Self {
    Self {
      session,
      visiting: BTreeSet::new(),
    }
  }

  /// Presence directive followed by the constraints of the field's schema.
  pub(crate) fn field_directives(
    &mut self,
    location: &str,
    document: &'a LoadedDocument,
    source: SchemaSource<'a>,
    presence: Presence,
  ) -> GeneratorResult<Vec<ValidationDirective>> {
    let mut directives = match presence {
      Presence::Required => vec![ValidationDirective::Required],
      Presence::OmitIfAbsent => vec![ValidationDirective::OmitIfAbsent],
      Presence::Unconstrained => vec![],
    };
    directives.extend(self.synthesize(location, document, source)?);
    Ok(directives)
  }

  pub(crate) fn synthesize(
    &mut self,
    location: &str,
    document: &'a LoadedDocument,
    source: SchemaSource<'a>,
  ) -> GeneratorResult<Vec<ValidationDirective>> {
    match SchemaNode::classify(source) {
      Some(SchemaNode::Reference(reference)) => {
        let located = locate(
          self.session.documents,
          document,
          reference,
          ComponentKind::Schemas,
          resolve::schemas,
        )?;
        let key = (located.document.path.clone(), located.key);
        if !self.visiting.insert(key.clone()) {
          return Ok(vec![]);
        }
        let directives = self.synthesize(location, located.document, SchemaSource::from(located.value));
        self.visiting.remove(&key);
        directives
      }
      Some(SchemaNode::Alias { target, .. }) => self.synthesize(location, document, target),
      Some(SchemaNode::Scalar { schema, .. }) => Ok(self.scalar(location, schema)),
      Some(SchemaNode::Array { array, .. }) => self.array(location, document, array),
      Some(SchemaNode::Object { .. }) | None => Ok(vec![]),
    }
  }

  fn scalar(&mut self, location: &str, schema: &Schema) -> Vec<ValidationDirective> {
    let mut directives = vec![];
    match &schema.schema_kind {
      SchemaKind::Type(Type::String(string)) => {
        if let Some(min) = string.min_length.filter(|min| *min > 0) {
          directives.push(ValidationDirective::LengthMin(min as u64));
        }
        if let Some(max) = string.max_length {
          directives.push(ValidationDirective::LengthMax(max as u64));
        }
        if string.pattern.is_some() {
          self.unsupported(location, "pattern");
        }
        let values: Vec<String> = string.enumeration.iter().flatten().cloned().collect();
        if !values.is_empty() {
          directives.push(ValidationDirective::OneOf(values));
        }
        if let VariantOrUnknownOrEmpty::Unknown(format) = &string.format
          && let Some(format) = FormatDirective::from_format(format)
        {
          directives.push(ValidationDirective::Format(format));
        }
      }
      SchemaKind::Type(Type::Integer(integer)) => {
        if let Some(min) = integer.minimum {
          directives.push(ValidationDirective::NumericMin(min as f64));
        }
        if let Some(max) = integer.maximum {
          directives.push(ValidationDirective::NumericMax(max as f64));
        }
        self.numeric_warnings(
          location,
          integer.multiple_of.is_some(),
          integer.exclusive_minimum,
          integer.exclusive_maximum,
        );
        let values: Vec<String> = integer.enumeration.iter().flatten().map(ToString::to_string).collect();
        if !values.is_empty() {
          directives.push(ValidationDirective::OneOf(values));
        }
      }
      SchemaKind::Type(Type::Number(number)) => {
        if let Some(min) = number.minimum {
          directives.push(ValidationDirective::NumericMin(min));
        }
        if let Some(max) = number.maximum {
          directives.push(ValidationDirective::NumericMax(max));
        }
        self.numeric_warnings(
          location,
          number.multiple_of.is_some(),
          number.exclusive_minimum,
          number.exclusive_maximum,
        );
        let values: Vec<String> = number.enumeration.iter().flatten().map(ToString::to_string).collect();
        if !values.is_empty() {
          directives.push(ValidationDirective::OneOf(values));
        }
      }
      _ => {}
    }
    directives
  }

  fn array(
    &mut self,
    location: &str,
    document: &'a LoadedDocument,
    array: &'a ArrayType,
  ) -> GeneratorResult<Vec<ValidationDirective>> {
    let mut directives = vec![];
    if let Some(min) = array.min_items.filter(|min| *min > 0) {
      directives.push(ValidationDirective::ItemsMin(min as u64));
    }
    if let Some(max) = array.max_items {
      directives.push(ValidationDirective::ItemsMax(max as u64));
    }
    if array.unique_items {
      directives.push(ValidationDirective::Unique);
    }
    if let Some(items) = &array.items {
      let item_directives = self.synthesize(location, document, SchemaSource::from(items))?;
      if !item_directives.is_empty() {
        directives.push(ValidationDirective::Dive);
        directives.extend(item_directives);
      }
    }
    Ok(directives)
  }

  fn numeric_warnings(&mut self, location: &str, multiple_of: bool, exclusive_min: bool, exclusive_max: bool) {
    for (present, constraint) in [
      (multiple_of, "multipleOf"),
      (exclusive_min, "exclusiveMinimum"),
      (exclusive_max, "exclusiveMaximum"),
    ] {
      if present {
        self.unsupported(location, constraint);
      }
    }
  }

  fn unsupported(&mut self, location: &str, constraint: &str) {
    self.session.warn(GenerationWarning::UnsupportedConstraint {
      location: location.to_string(),
      constraint: constraint.to_string(),
    });
  }
}

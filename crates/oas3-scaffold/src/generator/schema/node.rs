use openapiv3::{
  ArrayType, IntegerFormat, ObjectType, ReferenceOr, Schema, SchemaKind, StringFormat, Type, VariantOrUnknownOrEmpty,
};

use crate::generator::ast::Primitive;

/// A schema position: either a `$ref` or an inline schema.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SchemaSource<'a> {
  Ref(&'a str),
  Inline(&'a Schema),
}

impl<'a> From<&'a ReferenceOr<Schema>> for SchemaSource<'a> {
  fn from(value: &'a ReferenceOr<Schema>) -> Self {
    match value {
      ReferenceOr::Reference { reference } => Self::Ref(reference),
      ReferenceOr::Item(schema) => Self::Inline(schema),
    }
  }
}

impl<'a> From<&'a ReferenceOr<Box<Schema>>> for SchemaSource<'a> {
  fn from(value: &'a ReferenceOr<Box<Schema>>) -> Self {
    match value {
      ReferenceOr::Reference { reference } => Self::Ref(reference),
      ReferenceOr::Item(schema) => Self::Inline(schema),
    }
  }
}

/// The closed set of schema shapes the compiler accepts.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SchemaNode<'a> {
  Scalar { primitive: Primitive, schema: &'a Schema },
  Object { schema: &'a Schema, object: &'a ObjectType },
  Array { schema: &'a Schema, array: &'a ArrayType },
  /// A single-member `allOf`/`oneOf`/`anyOf` wrapper around another schema.
  Alias { schema: &'a Schema, target: SchemaSource<'a> },
  Reference(&'a str),
}

impl<'a> SchemaNode<'a> {
  /// Classifies a schema position, or returns `None` when its shape is unsupported.
  pub(crate) fn classify(source: SchemaSource<'a>) -> Option<Self> {
    let schema = match source {
      SchemaSource::Ref(reference) => return Some(Self::Reference(reference)),
      SchemaSource::Inline(schema) => schema,
    };
    let node = match &schema.schema_kind {
      SchemaKind::Type(Type::String(string)) => Self::Scalar {
        primitive: match string.format {
          VariantOrUnknownOrEmpty::Item(StringFormat::DateTime) => Primitive::Timestamp,
          _ => Primitive::String,
        },
        schema,
      },
      SchemaKind::Type(Type::Integer(integer)) => Self::Scalar {
        primitive: match integer.format {
          VariantOrUnknownOrEmpty::Item(IntegerFormat::Int32) => Primitive::I32,
          _ => Primitive::I64,
        },
        schema,
      },
      SchemaKind::Type(Type::Number(_)) => Self::Scalar {
        primitive: Primitive::F64,
        schema,
      },
      SchemaKind::Type(Type::Boolean { .. }) => Self::Scalar {
        primitive: Primitive::Bool,
        schema,
      },
      SchemaKind::Type(Type::Object(object)) => Self::Object { schema, object },
      SchemaKind::Type(Type::Array(array)) => Self::Array { schema, array },
      SchemaKind::AllOf { all_of: members }
      | SchemaKind::OneOf { one_of: members }
      | SchemaKind::AnyOf { any_of: members }
        if members.len() == 1 =>
      {
        Self::Alias {
          schema,
          target: SchemaSource::from(&members[0]),
        }
      }
      _ => return None,
    };
    Some(node)
  }

  /// Whether this position explicitly allows `null`.
  pub(crate) fn nullable(&self) -> bool {
    match self {
      Self::Scalar { schema, .. }
      | Self::Object { schema, .. }
      | Self::Array { schema, .. }
      | Self::Alias { schema, .. } => schema.schema_data.nullable,
      Self::Reference(_) => false,
    }
  }

  pub(crate) fn description(&self) -> Option<String> {
    match self {
      Self::Scalar { schema, .. }
      | Self::Object { schema, .. }
      | Self::Array { schema, .. }
      | Self::Alias { schema, .. } => schema.schema_data.description.clone(),
      Self::Reference(_) => None,
    }
  }
}

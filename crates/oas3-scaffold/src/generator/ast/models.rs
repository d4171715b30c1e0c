use std::collections::BTreeSet;

use super::{TypeRef, ValidationDirective};

/// One property of a generated object model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
  /// Normalized property name, see `format_identifier`.
  pub name: String,
  /// Rust field binding, unique within the owning model.
  pub ident: String,
  /// Wire key as declared in the document.
  pub key: String,
  pub ty: TypeRef,
  pub required: bool,
  pub nullable: bool,
  /// Whether the field is emitted as `Option<T>`.
  pub optional_repr: bool,
  /// Whether the field breaks a by-value cycle through `Box<T>`.
  pub boxed: bool,
  pub directives: Vec<ValidationDirective>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDef {
  pub name: String,
  pub fields: Vec<FieldDef>,
  pub docs: Option<String>,
}

/// A named list type, emitted as `pub type Name = Vec<Item>;`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDef {
  pub name: String,
  pub item: TypeRef,
  pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasDef {
  pub name: String,
  pub target: TypeRef,
  pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelDecl {
  Object(ObjectDef),
  Array(ArrayDef),
  Alias(AliasDef),
}

impl ModelDecl {
  pub fn name(&self) -> &str {
    match self {
      Self::Object(def) => &def.name,
      Self::Array(def) => &def.name,
      Self::Alias(def) => &def.name,
    }
  }

  /// Every type referenced directly by this declaration.
  pub fn referenced_types(&self) -> Vec<&TypeRef> {
    match self {
      Self::Object(def) => def.fields.iter().map(|field| &field.ty).collect(),
      Self::Array(def) => vec![&def.item],
      Self::Alias(def) => vec![&def.target],
    }
  }

  pub fn uses_timestamp(&self) -> bool {
    self.referenced_types().into_iter().any(TypeRef::uses_timestamp)
  }

  pub fn external_units(&self) -> BTreeSet<String> {
    let mut units = BTreeSet::new();
    for ty in self.referenced_types() {
      ty.collect_external_units(&mut units);
    }
    units
  }
}

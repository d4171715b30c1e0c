use std::collections::BTreeSet;

use itertools::Itertools;
use openapiv3::{ArrayType, ObjectType};

use super::{SchemaNode, SchemaSource};
use crate::{
  generator::{
    ast::{AliasDef, ArrayDef, FieldDef, ModelDecl, ObjectDef, TypeRef},
    constraints::{ConstraintSynthesizer, Presence},
    errors::{GeneratorError, GeneratorResult},
    naming::identifiers::{ensure_unique, format_identifier, to_rust_field_name, to_rust_type_name},
    resolve::{self, locate},
    session::{Origin, Session},
  },
  utils::{refs::ComponentKind, spec::LoadedDocument},
};

/// Turns schemas into model declarations registered on the session.
pub(crate) struct SchemaCompiler<'s, 'a> {
  session: &'s mut Session<'a>,
}

impl<'s, 'a> SchemaCompiler<'s, 'a> {
  pub(crate) fn new(session: &'s mut Session<'a>) -> Self {
    Self { session }
  }

  /// Compiles every component schema of the unit's document, in name order.
  pub(crate) fn compile_components(&mut self) -> GeneratorResult<()> {
    for name in self.session.component_names() {
      self.ensure_component(&name)?;
    }
    Ok(())
  }

  /// Reserves `name` for `origin` and declares the schema under it.
  pub(crate) fn process_schema(
    &mut self,
    name: &str,
    origin: Origin,
    document: &'a LoadedDocument,
    source: SchemaSource<'a>,
  ) -> GeneratorResult<()> {
    self.session.reserve(name, origin)?;
    self.declare(name, document, source)
  }

  /// Type of a schema position, compiling inline composites under `name`.
  pub(crate) fn resolve_type(
    &mut self,
    name: &str,
    origin: Origin,
    document: &'a LoadedDocument,
    source: SchemaSource<'a>,
  ) -> GeneratorResult<TypeRef> {
    match SchemaNode::classify(source) {
      None => Err(GeneratorError::UnsupportedSchemaType(name.to_string())),
      Some(SchemaNode::Scalar { primitive, .. }) => Ok(primitive.into()),
      Some(SchemaNode::Reference(reference)) => self.resolve_reference(document, reference),
      Some(SchemaNode::Alias { target, .. }) => self.resolve_type(name, origin, document, target),
      Some(SchemaNode::Object { .. } | SchemaNode::Array { .. }) => {
        self.process_schema(name, origin, document, source)?;
        Ok(TypeRef::named(name))
      }
    }
  }

  /// Type of a `#/components/schemas` reference made from `document`.
  ///
  /// Targets in the unit's own document are compiled on demand; targets elsewhere become
  /// references into that document's unit.
  pub(crate) fn resolve_reference(&mut self, document: &'a LoadedDocument, reference: &str) -> GeneratorResult<TypeRef> {
    let located = locate(
      self.session.documents,
      document,
      reference,
      ComponentKind::Schemas,
      resolve::schemas,
    )?;
    let name = to_rust_type_name(&located.key);
    if located.document.path == self.session.document.path {
      self.ensure_component(&name)?;
      Ok(TypeRef::Named(name))
    } else {
      self.session.record_external_unit(&located.document.unit);
      Ok(TypeRef::External {
        unit: located.document.unit.clone(),
        name,
      })
    }
  }

  /// Builds one object field; shared by object schemas and parameter groups.
  pub(crate) fn build_field(
    &mut self,
    owner: &str,
    key: &str,
    document: &'a LoadedDocument,
    source: SchemaSource<'a>,
    required: bool,
    used: &mut BTreeSet<String>,
  ) -> GeneratorResult<FieldDef> {
    let name = format_identifier(key);
    let child = format!("{owner}{name}");
    let node = SchemaNode::classify(source).ok_or_else(|| GeneratorError::UnsupportedSchemaType(child.clone()))?;
    let ty = self.resolve_type(
      &child,
      Origin::Property {
        parent: owner.to_string(),
        key: key.to_string(),
      },
      document,
      source,
    )?;

    let nullable = match node {
      SchemaNode::Alias {
        target: SchemaSource::Inline(inner),
        ..
      } => node.nullable() || inner.schema_data.nullable,
      _ => node.nullable(),
    };
    let required_as_optional = self.session.options.required_as_optional;
    let presence = Presence::for_field(required, nullable, required_as_optional);
    let directives = ConstraintSynthesizer::new(&mut *self.session).field_directives(
      &format!("{owner}.{key}"),
      document,
      source,
      presence,
    )?;

    let ident = field_ident(key, used);
    Ok(FieldDef {
      name,
      ident,
      key: key.to_string(),
      ty,
      required,
      nullable,
      optional_repr: !required || nullable || required_as_optional,
      boxed: false,
      directives,
    })
  }

  fn ensure_component(&mut self, name: &str) -> GeneratorResult<()> {
    if !self.session.begin_component(name) {
      return Ok(());
    }
    let document = self.session.document;
    let schema = self
      .session
      .component_key(name)
      .and_then(|key| document.spec.components.as_ref()?.schemas.get(key))
      .ok_or_else(|| GeneratorError::GenerationInvariant(format!("component {name} is not registered")))?;
    self.declare(name, document, SchemaSource::from(schema))
  }

  fn declare(&mut self, name: &str, document: &'a LoadedDocument, source: SchemaSource<'a>) -> GeneratorResult<()> {
    let node = SchemaNode::classify(source).ok_or_else(|| GeneratorError::UnsupportedSchemaType(name.to_string()))?;
    let docs = node.description();
    match node {
      SchemaNode::Scalar { primitive, .. } => self.alias(name, primitive.into(), docs),
      SchemaNode::Reference(reference) => {
        let target = self.resolve_reference(document, reference)?;
        self.alias(name, target, docs)
      }
      SchemaNode::Alias {
        target: SchemaSource::Ref(reference),
        ..
      } => {
        let target = self.resolve_reference(document, reference)?;
        self.alias(name, target, docs)
      }
      SchemaNode::Alias { target, .. } => self.declare(name, document, target),
      SchemaNode::Object { object, .. } => self.declare_object(name, document, object, docs),
      SchemaNode::Array { array, .. } => self.declare_array(name, document, array, docs),
    }
  }

  fn alias(&mut self, name: &str, target: TypeRef, docs: Option<String>) -> GeneratorResult<()> {
    self.session.insert_model(ModelDecl::Alias(AliasDef {
      name: name.to_string(),
      target,
      docs,
    }))
  }

  fn declare_object(
    &mut self,
    name: &str,
    document: &'a LoadedDocument,
    object: &'a ObjectType,
    docs: Option<String>,
  ) -> GeneratorResult<()> {
    let required: BTreeSet<&str> = object.required.iter().map(String::as_str).collect();
    let mut used = BTreeSet::new();
    let mut fields = Vec::with_capacity(object.properties.len());
    for (key, property) in object.properties.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
      let field = self.build_field(
        name,
        key,
        document,
        SchemaSource::from(property),
        required.contains(key.as_str()),
        &mut used,
      )?;
      fields.push(field);
    }
    self.session.insert_model(ModelDecl::Object(ObjectDef {
      name: name.to_string(),
      fields,
      docs,
    }))
  }

  fn declare_array(
    &mut self,
    name: &str,
    document: &'a LoadedDocument,
    array: &'a ArrayType,
    docs: Option<String>,
  ) -> GeneratorResult<()> {
    let items = array
      .items
      .as_ref()
      .ok_or_else(|| GeneratorError::UnsupportedSchemaType(name.to_string()))?;
    let item = self.resolve_type(
      &format!("{name}Item"),
      Origin::Items {
        parent: name.to_string(),
      },
      document,
      SchemaSource::from(items),
    )?;
    self.session.insert_model(ModelDecl::Array(ArrayDef {
      name: name.to_string(),
      item,
      docs,
    }))
  }
}

/// Unique Rust binding for a wire key within one model.
pub(crate) fn field_ident(key: &str, used: &mut BTreeSet<String>) -> String {
  let base = match to_rust_field_name(key) {
    ident if ident == "_" => "field".to_string(),
    ident => ident,
  };
  let ident = ensure_unique(&base, used);
  used.insert(ident.clone());
  ident
}

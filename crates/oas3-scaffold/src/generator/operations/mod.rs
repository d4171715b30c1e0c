mod parameters;
mod requests;
mod responses;


use std::collections::BTreeSet;

use http::Method;
use indexmap::IndexMap;
use itertools::Itertools;
use mediatype::{
  MediaType,
  names::{APPLICATION, JSON},
};
use openapiv3::{Operation, PathItem, ReferenceOr};

use crate::{
  generator::{
    ast::{OperationDescriptor, Primitive, TypeRef},
    errors::{GeneratorError, GeneratorResult},
    naming::identifiers::format_identifier,
    resolve::{self, locate},
    schema::{SchemaCompiler, SchemaNode, SchemaSource},
    session::{Origin, Session},
  },
  utils::{refs::ComponentKind, spec::LoadedDocument},
};

/// Operations of a path item in a fixed verb order.
pub(crate) fn path_operations(item: &PathItem) -> Vec<(Method, &Operation)> {
  [
    (Method::GET, &item.get),
    (Method::PUT, &item.put),
    (Method::POST, &item.post),
    (Method::DELETE, &item.delete),
    (Method::OPTIONS, &item.options),
    (Method::HEAD, &item.head),
    (Method::PATCH, &item.patch),
    (Method::TRACE, &item.trace),
  ]
  .into_iter()
  .filter_map(|(method, operation)| operation.as_ref().map(|operation| (method, operation)))
  .collect()
}

/// Stem for every generated name of an operation: the normalized operationId, or the verb and
/// path followed by `Json` when no usable operationId is declared.
pub(crate) fn handler_base_name(method: &Method, path: &str, operation_id: Option<&str>) -> String {
  let mut base = operation_id.map(format_identifier).unwrap_or_default();
  if base.is_empty() {
    base = format!(
      "{}{}Json",
      format_identifier(&method.as_str().to_ascii_lowercase()),
      format_identifier(path)
    );
  }
  if base.starts_with(|c: char| c.is_ascii_digit()) {
    base.insert(0, 'T');
  }
  base
}

pub(crate) fn is_json_media(content_type: &str) -> bool {
  MediaType::parse(content_type).is_ok_and(|media| media.ty == APPLICATION && media.subty == JSON && media.suffix.is_none())
}

/// Turns path operations into descriptors, registering their models on the session.
pub(crate) struct OperationCompiler<'s, 'a> {
  session: &'s mut Session<'a>,
}

impl<'s, 'a> OperationCompiler<'s, 'a> {
  pub(crate) fn new(session: &'s mut Session<'a>) -> Self {
    Self { session }
  }

  pub(crate) fn compile_paths(&mut self) -> GeneratorResult<()> {
    let document = self.session.document;
    for (path, item) in document.spec.paths.paths.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
      let item = match item {
        ReferenceOr::Item(item) => item,
        ReferenceOr::Reference { reference } => {
          return Err(GeneratorError::spec(
            document.display_name(),
            format!("path item reference {reference} is not supported"),
          ));
        }
      };
      for (method, operation) in path_operations(item) {
        let descriptor = self.compile_operation(path, method, item, operation)?;
        self.session.push_operation(descriptor);
      }
    }
    Ok(())
  }

  fn compile_operation(
    &mut self,
    path: &str,
    method: Method,
    item: &'a PathItem,
    operation: &'a Operation,
  ) -> GeneratorResult<OperationDescriptor> {
    let base = handler_base_name(&method, path, operation.operation_id.as_deref());
    let mut descriptor = OperationDescriptor::new(base, method, path.to_string(), operation.operation_id.clone());
    let label = descriptor.label();
    for name in [
      &descriptor.contract.trait_name,
      &descriptor.contract.request,
      &descriptor.contract.response,
    ] {
      self.session.reserve_handler_name(name, &label)?;
    }

    descriptor.parameters = self.parameters(&descriptor, item, operation)?;
    descriptor.body = self.request_body(&descriptor, operation)?;
    descriptor.responses = self.responses(&descriptor, operation)?;
    Ok(descriptor)
  }

  fn schemas(&mut self) -> SchemaCompiler<'_, 'a> {
    SchemaCompiler::new(&mut *self.session)
  }

  /// Schema of the single JSON entry of a content map.
  fn json_schema(
    label: &str,
    target: &str,
    content: &'a IndexMap<String, openapiv3::MediaType>,
  ) -> GeneratorResult<Option<SchemaSource<'a>>> {
    if content.len() > 1 {
      return Err(GeneratorError::MultipleContentTypesUnsupported {
        operation: label.to_string(),
        target: target.to_string(),
      });
    }
    if let Some(content_type) = content.keys().find(|content_type| !is_json_media(content_type)) {
      return Err(GeneratorError::UnsupportedContentType {
        operation: label.to_string(),
        content_type: content_type.clone(),
      });
    }
    Ok(
      content
        .values()
        .next()
        .and_then(|media| media.schema.as_ref())
        .map(SchemaSource::from),
    )
  }

  /// Type of a request or response payload; inline schemas are registered under `name`.
  fn body_type(
    &mut self,
    name: &str,
    label: &str,
    document: &'a LoadedDocument,
    source: SchemaSource<'a>,
  ) -> GeneratorResult<TypeRef> {
    match source {
      SchemaSource::Ref(reference) => self.schemas().resolve_reference(document, reference),
      SchemaSource::Inline(_) => {
        self
          .schemas()
          .process_schema(name, Origin::Operation(label.to_string()), document, source)?;
        Ok(TypeRef::named(name))
      }
    }
  }

  /// Primitive a parameter or header schema resolves to, following references and wrappers.
  fn scalar_primitive(
    &self,
    mut document: &'a LoadedDocument,
    mut source: SchemaSource<'a>,
  ) -> GeneratorResult<Option<Primitive>> {
    let mut visited = BTreeSet::new();
    loop {
      match SchemaNode::classify(source) {
        Some(SchemaNode::Scalar { primitive, .. }) => return Ok(Some(primitive)),
        Some(SchemaNode::Alias { target, .. }) => source = target,
        Some(SchemaNode::Reference(reference)) => {
          let located = locate(
            self.session.documents,
            document,
            reference,
            ComponentKind::Schemas,
            resolve::schemas,
          )?;
          if !visited.insert((located.document.path.clone(), located.key)) {
            return Ok(None);
          }
          document = located.document;
          source = SchemaSource::from(located.value);
        }
        Some(SchemaNode::Object { .. } | SchemaNode::Array { .. }) | None => return Ok(None),
      }
    }
  }
}

use std::collections::BTreeSet;

use indexmap::IndexMap;
use itertools::Itertools;
use openapiv3::{Header, Operation, ParameterSchemaOrContent, ReferenceOr, StatusCode};

use super::OperationCompiler;
use crate::{
  generator::{
    ast::{ModelDecl, ObjectDef, OperationDescriptor, ResponseDescriptor},
    errors::{GeneratorError, GeneratorResult},
    metrics::GenerationWarning,
    resolve::{self, resolve_item},
    schema::SchemaSource,
    session::Origin,
  },
  utils::{refs::ComponentKind, spec::LoadedDocument},
};

impl<'a> OperationCompiler<'_, 'a> {
  /// One descriptor per numeric status code, ordered by code.
  pub(super) fn responses(
    &mut self,
    descriptor: &OperationDescriptor,
    operation: &'a Operation,
  ) -> GeneratorResult<Vec<ResponseDescriptor>> {
    let label = descriptor.label();
    if operation.responses.default.is_some() {
      self.skip(&label, "default".to_string());
    }

    let mut responses = vec![];
    for (status, value) in &operation.responses.responses {
      let code = match status {
        StatusCode::Code(code) => *code,
        StatusCode::Range(range) => {
          self.skip(&label, format!("{range}XX"));
          continue;
        }
      };
      let (owner, response) = resolve_item(
        self.session.documents,
        self.session.document,
        value,
        ComponentKind::Responses,
        resolve::responses,
      )?;
      let slot = descriptor.response_slot(code);
      self.session.reserve_handler_name(&slot, &label)?;

      let body = match Self::json_schema(&label, &format!("response {code}"), &response.content)? {
        Some(source) => Some(self.body_type(&format!("{slot}Body"), &label, owner, source)?),
        None => None,
      };
      let headers = self.response_headers(&slot, &label, owner, &response.headers)?;
      responses.push(ResponseDescriptor {
        status: code,
        body,
        headers,
      });
    }
    responses.sort_by_key(|response| response.status);
    Ok(responses)
  }

  fn response_headers(
    &mut self,
    slot: &str,
    label: &str,
    document: &'a LoadedDocument,
    headers: &'a IndexMap<String, ReferenceOr<Header>>,
  ) -> GeneratorResult<Option<String>> {
    if headers.is_empty() {
      return Ok(None);
    }
    let model = format!("{slot}Headers");
    self.session.reserve(&model, Origin::Operation(label.to_string()))?;

    let mut used = BTreeSet::new();
    let mut fields = Vec::with_capacity(headers.len());
    for (name, value) in headers.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
      let unsupported = || GeneratorError::UnsupportedParameterType {
        operation: label.to_string(),
        name: name.clone(),
      };
      let (owner, header) = resolve_item(
        self.session.documents,
        document,
        value,
        ComponentKind::Headers,
        resolve::headers,
      )?;
      let ParameterSchemaOrContent::Schema(schema) = &header.format else {
        return Err(unsupported());
      };
      let source = SchemaSource::from(schema);
      if self.scalar_primitive(owner, source)?.is_none() {
        return Err(unsupported());
      }
      fields.push(
        self
          .schemas()
          .build_field(&model, name, owner, source, header.required, &mut used)?,
      );
    }

    self.session.insert_model(ModelDecl::Object(ObjectDef {
      name: model.clone(),
      fields,
      docs: None,
    }))?;
    Ok(Some(model))
  }

  fn skip(&mut self, label: &str, status: String) {
    self.session.warn(GenerationWarning::ResponseSkipped {
      operation: label.to_string(),
      status,
    });
  }
}

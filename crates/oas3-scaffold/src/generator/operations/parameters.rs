use std::collections::{BTreeMap, BTreeSet};

use openapiv3::{Operation, Parameter, ParameterData, ParameterSchemaOrContent, PathItem};

use super::OperationCompiler;
use crate::{
  generator::{
    ast::{ModelDecl, ObjectDef, OperationDescriptor, ParamLocation, ParameterDescriptor, ParameterGroup},
    errors::{GeneratorError, GeneratorResult},
    resolve::{self, resolve_item},
    schema::SchemaSource,
    session::Origin,
  },
  utils::{refs::ComponentKind, spec::LoadedDocument},
};

fn split(parameter: &Parameter) -> (ParamLocation, &ParameterData) {
  match parameter {
    Parameter::Path { parameter_data, .. } => (ParamLocation::Path, parameter_data),
    Parameter::Query { parameter_data, .. } => (ParamLocation::Query, parameter_data),
    Parameter::Header { parameter_data, .. } => (ParamLocation::Header, parameter_data),
    Parameter::Cookie { parameter_data, .. } => (ParamLocation::Cookie, parameter_data),
  }
}

impl<'a> OperationCompiler<'_, 'a> {
  /// Merges path-level and operation parameters and builds one model per location.
  pub(super) fn parameters(
    &mut self,
    descriptor: &OperationDescriptor,
    item: &'a PathItem,
    operation: &'a Operation,
  ) -> GeneratorResult<Vec<ParameterGroup>> {
    let documents = self.session.documents;
    let document = self.session.document;
    let mut merged: BTreeMap<(ParamLocation, &'a str), (&'a LoadedDocument, &'a ParameterData)> = BTreeMap::new();
    for value in item.parameters.iter().chain(&operation.parameters) {
      let (owner, parameter) = resolve_item(documents, document, value, ComponentKind::Parameters, resolve::parameters)?;
      let (location, data) = split(parameter);
      merged.insert((location, data.name.as_str()), (owner, data));
    }

    let label = descriptor.label();
    let mut groups = vec![];
    for location in ParamLocation::ALL {
      let members: Vec<_> = merged
        .iter()
        .filter(|((member_location, _), _)| *member_location == location)
        .map(|(_, member)| *member)
        .collect();
      if members.is_empty() {
        continue;
      }

      let model = format!("{}{}", descriptor.base, location.model_suffix());
      self.session.reserve(&model, Origin::Operation(label.clone()))?;
      let mut used = BTreeSet::new();
      let mut fields = Vec::with_capacity(members.len());
      let mut params = Vec::with_capacity(members.len());
      for (owner, data) in members {
        let unsupported = || GeneratorError::UnsupportedParameterType {
          operation: label.clone(),
          name: data.name.clone(),
        };
        let ParameterSchemaOrContent::Schema(schema) = &data.format else {
          return Err(unsupported());
        };
        let source = SchemaSource::from(schema);
        let primitive = self.scalar_primitive(owner, source)?.ok_or_else(unsupported)?;
        let required = data.required || location == ParamLocation::Path;
        let field = self
          .schemas()
          .build_field(&model, &data.name, owner, source, required, &mut used)?;
        params.push(ParameterDescriptor {
          location,
          name: data.name.clone(),
          ident: field.ident.clone(),
          primitive,
          required,
          optional_repr: field.optional_repr,
        });
        fields.push(field);
      }

      self.session.insert_model(ModelDecl::Object(ObjectDef {
        name: model.clone(),
        fields,
        docs: None,
      }))?;
      groups.push(ParameterGroup { location, model, params });
    }
    Ok(groups)
  }
}

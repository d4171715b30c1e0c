use std::collections::BTreeSet;

use indexmap::IndexMap;
use openapiv3::{Components, ReferenceOr};

use crate::{
  generator::errors::{GeneratorError, GeneratorResult},
  utils::{
    refs::{ComponentKind, parse_component_ref},
    spec::{DocumentSet, LoadedDocument},
  },
};

pub(crate) type Section<T> = fn(&Components) -> &IndexMap<String, ReferenceOr<T>>;

/// A component located through a `$ref`, with the document that declares it.
pub(crate) struct Located<'a, T> {
  pub document: &'a LoadedDocument,
  pub key: String,
  pub value: &'a ReferenceOr<T>,
}

/// Looks up the component a `$ref` names, following its document part.
pub(crate) fn locate<'a, T>(
  documents: &'a DocumentSet,
  document: &'a LoadedDocument,
  reference: &str,
  kind: ComponentKind,
  section: Section<T>,
) -> GeneratorResult<Located<'a, T>> {
  let parsed = parse_component_ref(reference)
    .filter(|parsed| parsed.kind == kind)
    .ok_or_else(|| GeneratorError::spec(document.display_name(), format!("unsupported reference {reference}")))?;
  let target = match parsed.file {
    Some(file) => documents.resolve_file(document, file)?,
    None => document,
  };
  let value = target
    .spec
    .components
    .as_ref()
    .and_then(|components| section(components).get(&parsed.name))
    .ok_or_else(|| GeneratorError::spec(document.display_name(), format!("unresolved reference {reference}")))?;
  Ok(Located {
    document: target,
    key: parsed.name,
    value,
  })
}

/// Follows references until an inline item is reached.
pub(crate) fn resolve_item<'a, T>(
  documents: &'a DocumentSet,
  document: &'a LoadedDocument,
  value: &'a ReferenceOr<T>,
  kind: ComponentKind,
  section: Section<T>,
) -> GeneratorResult<(&'a LoadedDocument, &'a T)> {
  let mut current = (document, value);
  let mut visited = BTreeSet::new();
  loop {
    match current.1 {
      ReferenceOr::Item(item) => return Ok((current.0, item)),
      ReferenceOr::Reference { reference } => {
        let located = locate(documents, current.0, reference, kind, section)?;
        if !visited.insert((located.document.path.clone(), located.key)) {
          return Err(GeneratorError::spec(
            document.display_name(),
            format!("reference chain of {kind} is cyclic"),
          ));
        }
        current = (located.document, located.value);
      }
    }
  }
}

pub(crate) fn schemas(components: &Components) -> &IndexMap<String, ReferenceOr<openapiv3::Schema>> {
  &components.schemas
}

pub(crate) fn parameters(components: &Components) -> &IndexMap<String, ReferenceOr<openapiv3::Parameter>> {
  &components.parameters
}

pub(crate) fn request_bodies(components: &Components) -> &IndexMap<String, ReferenceOr<openapiv3::RequestBody>> {
  &components.request_bodies
}

pub(crate) fn responses(components: &Components) -> &IndexMap<String, ReferenceOr<openapiv3::Response>> {
  &components.responses
}

pub(crate) fn headers(components: &Components) -> &IndexMap<String, ReferenceOr<openapiv3::Header>> {
  &components.headers
}

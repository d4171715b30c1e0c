use std::{
  collections::BTreeSet,
  path::{Component, Path, PathBuf},
};

use serde_json::Value;
use strum::{Display, EnumString};

/// Component sections a `$ref` may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub(crate) enum ComponentKind {
  #[strum(serialize = "schemas")]
  Schemas,
  #[strum(serialize = "parameters")]
  Parameters,
  #[strum(serialize = "requestBodies")]
  RequestBodies,
  #[strum(serialize = "responses")]
  Responses,
  #[strum(serialize = "headers")]
  Headers,
}

/// A `$ref` split into its document part and component location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ComponentRef<'a> {
  pub file: Option<&'a str>,
  pub kind: ComponentKind,
  pub name: String,
}

/// Returns the document part of a reference (`common.yaml` in `common.yaml#/components/...`).
pub(crate) fn document_part(reference: &str) -> Option<&str> {
  let file = reference.split_once('#').map_or(reference, |(file, _)| file);
  (!file.is_empty()).then_some(file)
}

/// Parses `[file]#/components/<kind>/<name>`, unescaping the JSON pointer segments.
pub(crate) fn parse_component_ref(reference: &str) -> Option<ComponentRef<'_>> {
  let (file, pointer) = reference.split_once('#')?;
  let mut segments = pointer.strip_prefix('/')?.split('/');
  if segments.next()? != "components" {
    return None;
  }
  let kind = segments.next()?.parse::<ComponentKind>().ok()?;
  let name = unescape_pointer(segments.next()?);
  if name.is_empty() || segments.next().is_some() {
    return None;
  }
  Some(ComponentRef {
    file: (!file.is_empty()).then_some(file),
    kind,
    name,
  })
}

fn unescape_pointer(segment: &str) -> String {
  segment.replace("~1", "/").replace("~0", "~")
}

/// Collects the document parts of every `$ref` found in a parsed document.
pub(crate) fn collect_document_refs(value: &Value, out: &mut BTreeSet<String>) {
  match value {
    Value::Object(map) => {
      for (key, child) in map {
        match (key.as_str(), child) {
          ("$ref", Value::String(reference)) => {
            if let Some(file) = document_part(reference) {
              out.insert(file.to_string());
            }
          }
          _ => collect_document_refs(child, out),
        }
      }
    }
    Value::Array(items) => items.iter().for_each(|item| collect_document_refs(item, out)),
    _ => {}
  }
}

/// Resolves a referenced document path relative to the referring document.
pub(crate) fn resolve_document_path(referrer: &Path, file: &str) -> PathBuf {
  let base = referrer.parent().unwrap_or_else(|| Path::new(""));
  normalize(&base.join(file))
}

/// Lexically removes `.` and `..` components.
pub(crate) fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      other => out.push(other),
    }
  }
  out
}

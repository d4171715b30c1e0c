use std::{
  collections::{BTreeMap, BTreeSet, VecDeque},
  ffi::OsStr,
  path::{Path, PathBuf},
};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use openapiv3::OpenAPI;
use serde_json::Value;

use crate::{
  generator::{
    errors::{GeneratorError, GeneratorResult},
    naming::identifiers::unit_name,
  },
  utils::refs::{collect_document_refs, normalize, resolve_document_path},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }

  pub fn parse_value(self, bytes: &[u8]) -> anyhow::Result<Value> {
    match self {
      Self::Json => Ok(serde_json::from_slice(bytes)?),
      Self::Yaml => Ok(serde_yaml::from_slice(bytes)?),
    }
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = SpecFormat::from_path(path);
    let file = AsyncMmapFile::open(path).await?;
    Ok(Self { file, format })
  }

  pub fn parse_value(&self) -> anyhow::Result<Value> {
    self.format.parse_value(self.file.as_slice())
  }

  pub fn parse(&self) -> anyhow::Result<OpenAPI> {
    Ok(parse_document(self.parse_value()?)?)
  }
}

/// Checks the declared version and deserializes a raw document.
fn parse_document(value: Value) -> Result<OpenAPI, DocumentError> {
  match value.get("openapi").and_then(Value::as_str) {
    Some(version) if version.starts_with("3.") => {}
    Some(version) => return Err(DocumentError::Version(version.to_string())),
    None => return Err(DocumentError::Version("<missing>".to_string())),
  }
  serde_json::from_value(value).map_err(DocumentError::Shape)
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
  #[error("unsupported OpenAPI version {0}, expected 3.x")]
  Version(String),
  #[error("malformed document: {0}")]
  Shape(serde_json::Error),
}

/// A parsed document together with the unit it generates.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
  pub path: PathBuf,
  pub unit: String,
  pub spec: OpenAPI,
}

impl LoadedDocument {
  pub fn display_name(&self) -> String {
    self
      .path
      .file_name()
      .and_then(OsStr::to_str)
      .map_or_else(|| self.path.display().to_string(), ToString::to_string)
  }
}

/// The root document and every document reachable through `$ref` file parts.
#[derive(Debug, Clone)]
pub struct DocumentSet {
  root: PathBuf,
  documents: BTreeMap<PathBuf, LoadedDocument>,
}

impl DocumentSet {
  /// Loads the root document and, breadth first, every document it references.
  pub async fn load(root: &Path) -> GeneratorResult<Self> {
    let root = normalize(root);
    let mut set = Self::empty(root.clone());
    let mut queue = VecDeque::from([root]);
    while let Some(path) = queue.pop_front() {
      if set.documents.contains_key(&path) {
        continue;
      }
      let loader = SpecLoader::open(&path)
        .await
        .map_err(|err| GeneratorError::spec(path.display(), err.to_string()))?;
      let value = loader
        .parse_value()
        .map_err(|err| GeneratorError::spec(path.display(), err.to_string()))?;
      queue.extend(set.insert(path, value)?);
    }
    Ok(set)
  }

  /// Builds a set from in-memory sources keyed by path, parsed by their extension.
  #[cfg(test)]
  pub fn from_sources<P: AsRef<Path>, S: AsRef<str>>(
    root: impl AsRef<Path>,
    sources: impl IntoIterator<Item = (P, S)>,
  ) -> GeneratorResult<Self> {
    let sources: BTreeMap<PathBuf, String> = sources
      .into_iter()
      .map(|(path, text)| (normalize(path.as_ref()), text.as_ref().to_string()))
      .collect();
    let root = normalize(root.as_ref());
    let mut set = Self::empty(root.clone());
    let mut queue = VecDeque::from([root]);
    while let Some(path) = queue.pop_front() {
      if set.documents.contains_key(&path) {
        continue;
      }
      let text = sources
        .get(&path)
        .ok_or_else(|| GeneratorError::spec(path.display(), "document not found"))?;
      let value = SpecFormat::from_path(&path)
        .parse_value(text.as_bytes())
        .map_err(|err| GeneratorError::spec(path.display(), err.to_string()))?;
      queue.extend(set.insert(path, value)?);
    }
    Ok(set)
  }

  fn empty(root: PathBuf) -> Self {
    Self {
      root,
      documents: BTreeMap::new(),
    }
  }

  /// Registers a parsed document and returns the documents it references.
  fn insert(&mut self, path: PathBuf, value: Value) -> GeneratorResult<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    collect_document_refs(&value, &mut files);
    let spec = parse_document(value).map_err(|err| GeneratorError::spec(path.display(), err.to_string()))?;

    let unit = unit_name(&path);
    if let Some(other) = self.documents.values().find(|doc| doc.unit == unit) {
      return Err(GeneratorError::spec(
        path.display(),
        format!("unit name {unit} is already used by {}", other.path.display()),
      ));
    }

    let referenced = files
      .iter()
      .map(|file| resolve_document_path(&path, file))
      .filter(|target| !self.documents.contains_key(target))
      .collect();
    self
      .documents
      .insert(path.clone(), LoadedDocument { path, unit, spec });
    Ok(referenced)
  }

  pub fn root(&self) -> GeneratorResult<&LoadedDocument> {
    self
      .documents
      .get(&self.root)
      .ok_or_else(|| GeneratorError::GenerationInvariant(format!("root document {} not loaded", self.root.display())))
  }

  pub fn by_unit(&self, unit: &str) -> Option<&LoadedDocument> {
    self.documents.values().find(|doc| doc.unit == unit)
  }

  pub fn iter(&self) -> impl Iterator<Item = &LoadedDocument> {
    self.documents.values()
  }

  pub fn len(&self) -> usize {
    self.documents.len()
  }

  /// Resolves the document part of a reference made from `referrer`.
  pub fn resolve_file(&self, referrer: &LoadedDocument, file: &str) -> GeneratorResult<&LoadedDocument> {
    let target = resolve_document_path(&referrer.path, file);
    self.documents.get(&target).ok_or_else(|| {
      GeneratorError::spec(
        referrer.path.display(),
        format!("referenced document {} was not loaded", target.display()),
      )
    })
  }
}

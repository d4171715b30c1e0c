use std::{
  collections::{BTreeMap, BTreeSet},
  fmt,
};

use crate::{
  generator::{
    GeneratorOptions,
    ast::{ModelDecl, OperationDescriptor},
    errors::{GeneratorError, GeneratorResult},
    metrics::GenerationWarning,
    naming::identifiers::to_rust_type_name,
  },
  utils::spec::{DocumentSet, LoadedDocument},
};

/// Where a declared name came from, reported on collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Origin {
  Component(String),
  Property { parent: String, key: String },
  Items { parent: String },
  Operation(String),
}

impl fmt::Display for Origin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Component(key) => write!(f, "component schema {key}"),
      Self::Property { parent, key } => write!(f, "property {key} of {parent}"),
      Self::Items { parent } => write!(f, "items of {parent}"),
      Self::Operation(label) => write!(f, "operation {label}"),
    }
  }
}

/// Mutable state for compiling one generation unit.
///
/// Every compiler pass borrows the session; names are reserved here before any declaration is
/// built, so a given name is owned by exactly one origin.
pub(crate) struct Session<'a> {
  pub(crate) documents: &'a DocumentSet,
  pub(crate) document: &'a LoadedDocument,
  pub(crate) options: &'a GeneratorOptions,
  models: BTreeMap<String, ModelDecl>,
  owners: BTreeMap<String, Origin>,
  handler_owners: BTreeMap<String, String>,
  components: BTreeMap<String, String>,
  compiled: BTreeSet<String>,
  operations: Vec<OperationDescriptor>,
  warnings: Vec<GenerationWarning>,
  external_units: BTreeSet<String>,
}

impl<'a> Session<'a> {
  /// Creates a session and reserves every component schema name of the document.
  pub(crate) fn new(
    documents: &'a DocumentSet,
    document: &'a LoadedDocument,
    options: &'a GeneratorOptions,
  ) -> GeneratorResult<Self> {
    let mut session = Self {
      documents,
      document,
      options,
      models: BTreeMap::new(),
      owners: BTreeMap::new(),
      handler_owners: BTreeMap::new(),
      components: BTreeMap::new(),
      compiled: BTreeSet::new(),
      operations: vec![],
      warnings: vec![],
      external_units: BTreeSet::new(),
    };
    if let Some(components) = &document.spec.components {
      for key in components.schemas.keys() {
        let name = to_rust_type_name(key);
        session.reserve(&name, Origin::Component(key.clone()))?;
        session.components.insert(name, key.clone());
      }
    }
    Ok(session)
  }

  /// Claims a model name for an origin. Re-claiming by the same origin is a no-op.
  pub(crate) fn reserve(&mut self, name: &str, origin: Origin) -> GeneratorResult<()> {
    match self.owners.get(name) {
      Some(owner) if *owner == origin => Ok(()),
      Some(owner) => Err(GeneratorError::NameCollision {
        name: name.to_string(),
        first: owner.to_string(),
        second: origin.to_string(),
      }),
      None => {
        self.owners.insert(name.to_string(), origin);
        Ok(())
      }
    }
  }

  /// Claims a name in the handler unit namespace.
  pub(crate) fn reserve_handler_name(&mut self, name: &str, operation: &str) -> GeneratorResult<()> {
    match self.handler_owners.get(name) {
      Some(owner) => Err(GeneratorError::NameCollision {
        name: name.to_string(),
        first: format!("operation {owner}"),
        second: format!("operation {operation}"),
      }),
      None => {
        self.handler_owners.insert(name.to_string(), operation.to_string());
        Ok(())
      }
    }
  }

  pub(crate) fn insert_model(&mut self, model: ModelDecl) -> GeneratorResult<()> {
    let name = model.name().to_string();
    if !self.owners.contains_key(&name) {
      return Err(GeneratorError::GenerationInvariant(format!(
        "model {name} was declared without reserving its name"
      )));
    }
    if self.models.insert(name.clone(), model).is_some() {
      return Err(GeneratorError::GenerationInvariant(format!("model {name} declared twice")));
    }
    Ok(())
  }

  /// Document key of a reserved component, by its Rust name.
  pub(crate) fn component_key(&self, name: &str) -> Option<&str> {
    self.components.get(name).map(String::as_str)
  }

  /// Marks a component as compiled; returns `false` if it already was.
  pub(crate) fn begin_component(&mut self, name: &str) -> bool {
    self.compiled.insert(name.to_string())
  }

  pub(crate) fn component_names(&self) -> Vec<String> {
    self.components.keys().cloned().collect()
  }

  pub(crate) fn push_operation(&mut self, operation: OperationDescriptor) {
    self.operations.push(operation);
  }

  pub(crate) fn warn(&mut self, warning: GenerationWarning) {
    if !self.warnings.contains(&warning) {
      self.warnings.push(warning);
    }
  }

  pub(crate) fn record_external_unit(&mut self, unit: &str) {
    self.external_units.insert(unit.to_string());
  }

  pub(crate) fn finish(self) -> CompiledUnit {
    CompiledUnit {
      unit: self.document.unit.clone(),
      document: self.document.clone(),
      models: self.models,
      operations: self.operations,
      warnings: self.warnings,
      external_units: self.external_units,
    }
  }
}

/// Output of compiling one unit, ready for emission.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
  pub unit: String,
  pub document: LoadedDocument,
  pub models: BTreeMap<String, ModelDecl>,
  pub operations: Vec<OperationDescriptor>,
  pub warnings: Vec<GenerationWarning>,
  pub external_units: BTreeSet<String>,
}

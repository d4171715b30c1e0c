//! Orchestration of the OpenAPI to axum scaffold pipeline.
//!
//! The orchestrator compiles the root document and every document it references (one generation
//! unit each), boxes recursive fields, plans deep validators across all units and renders the
//! three files of every unit.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! let documents = DocumentSet::load(Path::new("pets.yaml")).await?;
//! let output = Orchestrator::new(documents, GeneratorOptions::default()).generate()?;
//! for unit in &output.units {
//!   println!("{}: {} bytes of models", unit.unit, unit.sources.models.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeSet, VecDeque};

use crate::{
  generator::{
    GeneratorOptions,
    codegen::{self, UnitSources},
    deep_validation::ModelIndex,
    errors::{GeneratorError, GeneratorResult},
    metrics::GenerationStats,
    operations::OperationCompiler,
    schema::SchemaCompiler,
    schema_graph::{self, UnitModels},
    session::{CompiledUnit, Session},
  },
  utils::spec::DocumentSet,
};

/// High-level entry point of generation.
pub struct Orchestrator {
  documents: DocumentSet,
  options: GeneratorOptions,
}

/// Files of one generation unit, named after its source document.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
  pub unit: String,
  pub source: String,
  pub sources: UnitSources,
}

#[derive(Debug)]
pub struct GeneratedOutput {
  pub units: Vec<GeneratedUnit>,
  pub stats: GenerationStats,
}

impl Orchestrator {
  pub fn new(documents: DocumentSet, options: GeneratorOptions) -> Self {
    Self { documents, options }
  }

  /// Compiles the root document and every unit reachable from it, then renders all units.
  ///
  /// # Errors
  ///
  /// Fails on the first unit that cannot be compiled or rendered; nothing is returned for the
  /// other units in that case.
  pub fn generate(&self) -> GeneratorResult<GeneratedOutput> {
    let mut units = self.compile_units()?;
    let mut stats = GenerationStats::default();

    let (boxed, cycles) = {
      let models: UnitModels<'_> = units.iter().map(|unit| (unit.unit.as_str(), &unit.models)).collect();
      (schema_graph::plan_boxing(&models)?, schema_graph::detect_cycles(&models))
    };
    for field in &boxed {
      if let Some(unit) = units.iter_mut().find(|unit| unit.unit == field.unit) {
        field.apply(&mut unit.models);
      }
    }
    stats.record_cycles(cycles);

    let index = ModelIndex::new(&units);
    let mut generated = Vec::with_capacity(units.len());
    for unit in &units {
      let validators = index.plan_unit(unit);
      let sources = codegen::emit_unit(unit, &index, &validators, &self.options)?;

      stats.record_unit();
      stats.record_models(unit.models.values());
      stats.record_operations(unit.operations.len());
      stats.record_deep_validators(validators.len());
      stats.record_warnings(unit.warnings.iter().cloned());

      generated.push(GeneratedUnit {
        unit: unit.unit.clone(),
        source: unit.document.display_name(),
        sources,
      });
    }

    Ok(GeneratedOutput { units: generated, stats })
  }

  /// Compiles units breadth-first from the root, following cross-document references.
  fn compile_units(&self) -> GeneratorResult<Vec<CompiledUnit>> {
    let root = self.documents.root()?;
    let mut queue = VecDeque::from([root.unit.clone()]);
    let mut scheduled = BTreeSet::from([root.unit.clone()]);
    let mut units = vec![];

    while let Some(unit) = queue.pop_front() {
      let document = self
        .documents
        .by_unit(&unit)
        .ok_or_else(|| GeneratorError::GenerationInvariant(format!("unit {unit} was scheduled but never loaded")))?;

      let mut session = Session::new(&self.documents, document, &self.options)?;
      SchemaCompiler::new(&mut session).compile_components()?;
      OperationCompiler::new(&mut session).compile_paths()?;
      let compiled = session.finish();

      for external in &compiled.external_units {
        if scheduled.insert(external.clone()) {
          queue.push_back(external.clone());
        }
      }
      units.push(compiled);
    }

    Ok(units)
  }
}

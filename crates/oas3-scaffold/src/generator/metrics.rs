use strum::Display;

use crate::generator::ast::ModelDecl;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub units_generated: usize,
  pub models_generated: usize,
  pub structs_generated: usize,
  pub array_aliases_generated: usize,
  pub type_aliases_generated: usize,
  pub operations_converted: usize,
  pub deep_validators_generated: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_unit(&mut self) {
    self.units_generated += 1;
  }

  pub fn record_model(&mut self, model: &ModelDecl) {
    self.models_generated += 1;
    match model {
      ModelDecl::Object(_) => self.structs_generated += 1,
      ModelDecl::Array(_) => self.array_aliases_generated += 1,
      ModelDecl::Alias(_) => self.type_aliases_generated += 1,
    }
  }

  pub fn record_models<'a>(&mut self, models: impl IntoIterator<Item = &'a ModelDecl>) {
    for model in models {
      self.record_model(model);
    }
  }

  pub fn record_operations(&mut self, count: usize) {
    self.operations_converted += count;
  }

  pub fn record_deep_validators(&mut self, count: usize) {
    self.deep_validators_generated += count;
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    self.cycles_detected += cycles.len();
    self.cycle_details.extend(cycles);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "{location}: {constraint} constraint is not enforced")]
  UnsupportedConstraint { location: String, constraint: String },
  #[strum(to_string = "[{operation}] response '{status}' is not generated")]
  ResponseSkipped { operation: String, status: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::ResponseSkipped { .. })
  }
}

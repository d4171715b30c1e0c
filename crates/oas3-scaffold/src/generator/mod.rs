pub(crate) mod ast;
pub(crate) mod codegen;
pub(crate) mod constraints;
pub(crate) mod deep_validation;
pub mod errors;
pub mod metrics;
pub(crate) mod naming;
pub(crate) mod operations;
pub mod orchestrator;
pub(crate) mod resolve;
pub(crate) mod schema;
pub(crate) mod schema_graph;
pub(crate) mod session;

#[cfg(test)]
mod tests;

pub use metrics::GenerationStats;
pub use orchestrator::{GeneratedUnit, Orchestrator};

pub const DEFAULT_IMPORT_PREFIX: &str = "crate::generated";

/// Knobs shared by every generation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
  /// Module path under which unit modules are mounted, used for cross-unit imports.
  pub import_prefix: String,
  /// Types required fields as optional, leaving presence to deep validation.
  pub required_as_optional: bool,
}

impl Default for GeneratorOptions {
  fn default() -> Self {
    Self {
      import_prefix: DEFAULT_IMPORT_PREFIX.to_string(),
      required_as_optional: false,
    }
  }
}

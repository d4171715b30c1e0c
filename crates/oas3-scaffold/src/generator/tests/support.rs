use crate::{
  generator::{
    GeneratorOptions,
    errors::GeneratorResult,
    operations::OperationCompiler,
    orchestrator::{GeneratedOutput, Orchestrator},
    schema::SchemaCompiler,
    session::{CompiledUnit, Session},
  },
  utils::spec::DocumentSet,
};

pub(crate) const ROOT: &str = "api.yaml";

/// Wraps component schemas (indented YAML) in a minimal document.
pub(crate) fn with_schemas(schemas: &str) -> String {
  format!("openapi: 3.0.3\ninfo:\n  title: Test\n  version: 1.0.0\npaths: {{}}\ncomponents:\n  schemas:\n{schemas}")
}

/// Wraps path items (indented YAML) and optional component schemas in a minimal document.
pub(crate) fn with_paths(paths: &str, schemas: &str) -> String {
  let components = if schemas.is_empty() {
    String::new()
  } else {
    format!("components:\n  schemas:\n{schemas}")
  };
  format!("openapi: 3.0.3\ninfo:\n  title: Test\n  version: 1.0.0\npaths:\n{paths}{components}")
}

pub(crate) fn documents(source: &str) -> DocumentSet {
  DocumentSet::from_sources(ROOT, [(ROOT, source)]).expect("test document must load")
}

/// Runs schema and operation compilation on the root document only.
pub(crate) fn compile_with(source: &str, options: &GeneratorOptions) -> GeneratorResult<CompiledUnit> {
  let documents = documents(source);
  let document = documents.root()?;
  let mut session = Session::new(&documents, document, options)?;
  SchemaCompiler::new(&mut session).compile_components()?;
  OperationCompiler::new(&mut session).compile_paths()?;
  Ok(session.finish())
}

pub(crate) fn compile(source: &str) -> GeneratorResult<CompiledUnit> {
  compile_with(source, &GeneratorOptions::default())
}

pub(crate) fn generate(source: &str) -> GeneratorResult<GeneratedOutput> {
  Orchestrator::new(documents(source), GeneratorOptions::default()).generate()
}

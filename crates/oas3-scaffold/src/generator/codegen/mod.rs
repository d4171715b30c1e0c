mod handlers;
mod models;

#[cfg(test)]
mod tests;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use self::{handlers::HandlersFile, models::ModelsFile};
use crate::generator::{
  GeneratorOptions,
  ast::TypeRef,
  deep_validation::{DeepValidatorDef, ModelIndex},
  errors::{GeneratorError, GeneratorResult},
  session::CompiledUnit,
};

/// Metadata about the source document, rendered into every file header.
#[derive(Debug, Clone)]
pub struct CodeMetadata {
  pub title: String,
  pub version: String,
  pub description: Option<String>,
  pub source: String,
}

impl CodeMetadata {
  pub fn from_unit(unit: &CompiledUnit) -> Self {
    let info = &unit.document.spec.info;
    Self {
      title: info.title.clone(),
      version: info.version.clone(),
      description: info.description.clone(),
      source: unit.document.display_name(),
    }
  }

  fn header(&self) -> String {
    let mut header = format!(
      "//! AUTO-GENERATED CODE - DO NOT EDIT!\n//!\n//! {} {}\n//! Source: {}\n//! Generated by `oas3-scaffold`\n",
      self.title, self.version, self.source
    );
    if let Some(description) = self.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
      header.push_str("//!\n");
      for line in description.lines() {
        header.push_str(format!("//! {line}").trim_end());
        header.push('\n');
      }
    }
    header
  }
}

/// Formatted sources of one unit, written to `<output>/generated/<unit>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSources {
  pub models: String,
  pub handlers: String,
  pub module: String,
}

/// One `#[doc]` attribute per description line.
pub(crate) fn doc_attrs(docs: Option<&str>) -> TokenStream {
  let Some(docs) = docs.map(str::trim).filter(|docs| !docs.is_empty()) else {
    return quote! {};
  };
  let lines = docs.lines().map(|line| format!(" {}", line.trim_end()));
  quote! { #(#[doc = #lines])* }
}

pub(crate) fn format_tokens(tokens: TokenStream) -> GeneratorResult<String> {
  let syntax_tree = syn::parse2::<syn::File>(tokens)
    .map_err(|error| GeneratorError::GenerationInvariant(format!("emitted code does not parse: {error}")))?;
  Ok(prettyplease::unparse(&syntax_tree))
}

fn with_header(metadata: &CodeMetadata, code: &str) -> String {
  format!("{}\n{code}", metadata.header())
}

/// Renders the models, handlers and module files of a compiled unit.
pub(crate) fn emit_unit(
  unit: &CompiledUnit,
  index: &ModelIndex<'_>,
  validators: &[DeepValidatorDef],
  options: &GeneratorOptions,
) -> GeneratorResult<UnitSources> {
  check_references(unit, index)?;

  let metadata = CodeMetadata::from_unit(unit);
  let models = ModelsFile {
    unit,
    validators,
    import_prefix: &options.import_prefix,
  };
  let handlers = HandlersFile {
    unit,
    index,
    import_prefix: &options.import_prefix,
  };
  let module = quote! {
    pub mod handlers;
    pub mod models;
  };

  Ok(UnitSources {
    models: with_header(&metadata, &format_tokens(models.to_token_stream())?),
    handlers: with_header(&metadata, &format_tokens(handlers.to_token_stream())?),
    module: with_header(&metadata, &format_tokens(module)?),
  })
}

/// Every named type the unit mentions must be declared by the unit that owns it.
fn check_references(unit: &CompiledUnit, index: &ModelIndex<'_>) -> GeneratorResult<()> {
  let model_refs = unit.models.values().flat_map(|model| model.referenced_types());
  let operation_refs = unit.operations.iter().flat_map(|op| op.referenced_types());
  for ty in model_refs.chain(operation_refs) {
    check_reference(&unit.unit, ty, index)?;
  }
  let group_models = unit
    .operations
    .iter()
    .flat_map(|op| op.parameters.iter().map(|group| &group.model))
    .chain(unit.operations.iter().flat_map(|op| op.responses.iter().filter_map(|r| r.headers.as_ref())));
  for model in group_models {
    if !index.contains(&unit.unit, model) {
      return Err(GeneratorError::GenerationInvariant(format!(
        "model {model} of unit {} was never declared",
        unit.unit
      )));
    }
  }
  Ok(())
}

fn check_reference(unit: &str, ty: &TypeRef, index: &ModelIndex<'_>) -> GeneratorResult<()> {
  let (owner, name) = match ty {
    TypeRef::Primitive(_) => return Ok(()),
    TypeRef::Named(name) => (unit, name.as_str()),
    TypeRef::External { unit, name } => (unit.as_str(), name.as_str()),
  };
  if index.contains(owner, name) {
    Ok(())
  } else {
    Err(GeneratorError::GenerationInvariant(format!(
      "type {name} referenced from unit {unit} is not declared by unit {owner}"
    )))
  }
}

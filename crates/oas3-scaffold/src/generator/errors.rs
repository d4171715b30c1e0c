/// Failures that abort generation of a unit.
///
/// `SpecValidation` covers malformed input documents, the `Unsupported*`, `MethodBodyNotAllowed`
/// and `MultipleContentTypesUnsupported` variants cover input outside the supported subset, and
/// `NameCollision`/`GenerationInvariant` report naming conflicts and internal defects.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
  #[error("invalid document {document}: {message}")]
  SpecValidation { document: String, message: String },
  #[error("unsupported schema type for model {0}")]
  UnsupportedSchemaType(String),
  #[error("unsupported content type {content_type} for operation {operation}")]
  UnsupportedContentType { operation: String, content_type: String },
  #[error("{method} operation {operation} must not declare a request body")]
  MethodBodyNotAllowed { operation: String, method: String },
  #[error("{target} of operation {operation} declares more than one content type")]
  MultipleContentTypesUnsupported { operation: String, target: String },
  #[error("parameter {name} of operation {operation} has an unsupported type")]
  UnsupportedParameterType { operation: String, name: String },
  #[error("name {name} is declared by {first} and by {second}")]
  NameCollision { name: String, first: String, second: String },
  #[error("generation invariant violated: {0}")]
  GenerationInvariant(String),
}

impl GeneratorError {
  pub(crate) fn spec(document: impl std::fmt::Display, message: impl Into<String>) -> Self {
    Self::SpecValidation {
      document: document.to_string(),
      message: message.into(),
    }
  }
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

mod models;
mod operations;
mod types;
mod validation;


pub use models::{AliasDef, ArrayDef, FieldDef, ModelDecl, ObjectDef};
pub use operations::{
  OperationDescriptor, ParamLocation, ParameterDescriptor, ParameterGroup, RequestBodyDescriptor, ResponseDescriptor,
};
pub use types::{ExternalImport, Primitive, Scope, TypeRef, external_models_module};
pub use validation::{FormatDirective, ValidationDirective, directive_summary};

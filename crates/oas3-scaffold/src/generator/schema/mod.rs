mod compiler;
mod node;


pub(crate) use compiler::SchemaCompiler;
pub(crate) use node::{SchemaNode, SchemaSource};

mod constraints;
mod schema_graph;
mod session;
pub(crate) mod support;

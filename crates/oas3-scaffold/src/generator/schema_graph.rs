use std::collections::{BTreeMap, BTreeSet};

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use crate::generator::{
  ast::{ModelDecl, TypeRef},
  errors::{GeneratorError, GeneratorResult},
};

/// Models of every unit, keyed by unit name.
pub(crate) type UnitModels<'m> = BTreeMap<&'m str, &'m BTreeMap<String, ModelDecl>>;

/// A model of one unit: `(unit, model)`.
type Node<'m> = (&'m str, &'m str);

/// A struct field that must be emitted as `Box<T>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct BoxedField {
  pub unit: String,
  pub model: String,
  pub ident: String,
}

impl BoxedField {
  pub(crate) fn apply(&self, models: &mut BTreeMap<String, ModelDecl>) {
    if let Some(ModelDecl::Object(object)) = models.get_mut(&self.model)
      && let Some(field) = object.fields.iter_mut().find(|field| field.ident == self.ident)
    {
      field.boxed = true;
    }
  }
}

/// Reference cycles across all units, each labelled `unit::Model` and sorted.
pub(crate) fn detect_cycles(units: &UnitModels<'_>) -> Vec<Vec<String>> {
  let graph = build_graph(units, true);
  cyclic_components(&graph)
    .into_iter()
    .map(|component| component.into_iter().map(|(unit, name)| format!("{unit}::{name}")).collect())
    .collect()
}

/// Fields that would otherwise make a struct contain itself by value, possibly through models
/// of other units.
///
/// List models already provide indirection, so only direct and optional fields are considered.
pub(crate) fn plan_boxing(units: &UnitModels<'_>) -> GeneratorResult<Vec<BoxedField>> {
  let graph = build_graph(units, false);
  let mut boxed = vec![];

  for component in cyclic_components(&graph) {
    let members: BTreeSet<Node<'_>> = component.iter().copied().collect();
    let has_struct = component
      .iter()
      .any(|&(unit, name)| matches!(model(units, unit, name), Some(ModelDecl::Object(_))));
    if !has_struct {
      let names: Vec<String> = component.iter().map(|(_, name)| (*name).to_string()).collect();
      return Err(GeneratorError::UnsupportedSchemaType(names.join(" -> ")));
    }
    for &(unit, name) in &component {
      if let Some(ModelDecl::Object(object)) = model(units, unit, name) {
        boxed.extend(
          object
            .fields
            .iter()
            .filter(|field| target(unit, &field.ty).is_some_and(|target| members.contains(&target)))
            .map(|field| BoxedField {
              unit: unit.to_string(),
              model: name.to_string(),
              ident: field.ident.clone(),
            }),
        );
      }
    }
  }

  boxed.sort();
  Ok(boxed)
}

fn model<'m>(units: &UnitModels<'m>, unit: &str, name: &str) -> Option<&'m ModelDecl> {
  units.get(unit).copied().and_then(|models| models.get(name))
}

/// The model a type points at, seen from `unit`.
fn target<'m>(unit: &'m str, ty: &'m TypeRef) -> Option<Node<'m>> {
  match ty {
    TypeRef::Named(name) => Some((unit, name.as_str())),
    TypeRef::External { unit, name } => Some((unit.as_str(), name.as_str())),
    TypeRef::Primitive(_) => None,
  }
}

/// Edges from each model to the models it mentions, in any unit. Without `through_lists`, only
/// by-value containment is kept: array models contribute no edges.
fn build_graph<'m>(units: &UnitModels<'m>, through_lists: bool) -> DiGraphMap<Node<'m>, ()> {
  let mut graph = DiGraphMap::new();
  for (&unit, &models) in units {
    for (name, decl) in models {
      let node = (unit, name.as_str());
      graph.add_node(node);
      if !through_lists && matches!(decl, ModelDecl::Array(_)) {
        continue;
      }
      for ty in decl.referenced_types() {
        let Some((target_unit, target_name)) = target(unit, ty) else {
          continue;
        };
        if let Some((&key_unit, &target_models)) = units.get_key_value(target_unit)
          && let Some((key, _)) = target_models.get_key_value(target_name)
        {
          graph.add_edge(node, (key_unit, key.as_str()), ());
        }
      }
    }
  }
  graph
}

fn cyclic_components<'m>(graph: &DiGraphMap<Node<'m>, ()>) -> Vec<Vec<Node<'m>>> {
  let mut cycles: Vec<Vec<Node<'m>>> = kosaraju_scc(graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .map(|mut scc| {
      scc.sort();
      scc
    })
    .collect();
  cycles.sort();
  cycles
}

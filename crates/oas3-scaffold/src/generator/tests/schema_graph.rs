use std::collections::BTreeMap;

use crate::generator::{
  ast::{AliasDef, ArrayDef, FieldDef, ModelDecl, ObjectDef, Primitive, TypeRef},
  errors::GeneratorError,
  schema_graph::{UnitModels, detect_cycles, plan_boxing},
};

fn field(key: &str, ty: TypeRef) -> FieldDef {
  FieldDef {
    name: key.to_string(),
    ident: key.to_string(),
    key: key.to_string(),
    ty,
    required: false,
    nullable: false,
    optional_repr: true,
    boxed: false,
    directives: vec![],
  }
}

fn object(name: &str, fields: Vec<FieldDef>) -> ModelDecl {
  ModelDecl::Object(ObjectDef {
    name: name.to_string(),
    fields,
    docs: None,
  })
}

fn models(decls: Vec<ModelDecl>) -> BTreeMap<String, ModelDecl> {
  decls.into_iter().map(|decl| (decl.name().to_string(), decl)).collect()
}

fn single(models: &BTreeMap<String, ModelDecl>) -> UnitModels<'_> {
  BTreeMap::from([("api", models)])
}

/// Boxed fields as `unit::Model.key`.
fn boxed(units: &UnitModels<'_>) -> anyhow::Result<Vec<String>> {
  Ok(
    plan_boxing(units)?
      .into_iter()
      .map(|field| format!("{}::{}.{}", field.unit, field.model, field.ident))
      .collect(),
  )
}

fn labels(names: &[&str]) -> Vec<String> {
  names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn test_mutual_recursion_boxes_both_sides() -> anyhow::Result<()> {
  let graph = models(vec![
    object(
      "A",
      vec![field("b", TypeRef::named("B")), field("name", TypeRef::Primitive(Primitive::String))],
    ),
    object("B", vec![field("a", TypeRef::named("A"))]),
    object("C", vec![field("a", TypeRef::named("A"))]),
  ]);
  let units = single(&graph);
  assert_eq!(boxed(&units)?, ["api::A.b", "api::B.a"]);
  assert_eq!(detect_cycles(&units), vec![labels(&["api::A", "api::B"])]);
  Ok(())
}

#[test]
fn test_array_models_break_by_value_cycles() -> anyhow::Result<()> {
  let graph = models(vec![
    object("Tree", vec![field("children", TypeRef::named("TreeChildren"))]),
    ModelDecl::Array(ArrayDef {
      name: "TreeChildren".to_string(),
      item: TypeRef::named("Tree"),
      docs: None,
    }),
    object("Forest", vec![field("trees", TypeRef::named("Trees"))]),
    ModelDecl::Array(ArrayDef {
      name: "Trees".to_string(),
      item: TypeRef::named("Forest"),
      docs: None,
    }),
  ]);
  let units = single(&graph);
  assert!(boxed(&units)?.is_empty());
  assert_eq!(
    detect_cycles(&units),
    vec![labels(&["api::Forest", "api::Trees"]), labels(&["api::Tree", "api::TreeChildren"])]
  );
  Ok(())
}

#[test]
fn test_cycle_through_another_unit_is_boxed() -> anyhow::Result<()> {
  let external = |unit: &str, name: &str| TypeRef::External {
    unit: unit.to_string(),
    name: name.to_string(),
  };
  let left = models(vec![object("A", vec![field("b", external("b", "B"))])]);
  let right = models(vec![
    object("B", vec![field("a", external("a", "A"))]),
    object("Leaf", vec![field("name", TypeRef::Primitive(Primitive::String))]),
  ]);
  let units: UnitModels<'_> = BTreeMap::from([("a", &left), ("b", &right)]);

  let planned = plan_boxing(&units)?;
  assert_eq!(boxed(&units)?, ["a::A.b", "b::B.a"]);
  assert_eq!(detect_cycles(&units), vec![labels(&["a::A", "b::B"])]);

  let mut applied = left.clone();
  for field in planned.iter().filter(|field| field.unit == "a") {
    field.apply(&mut applied);
  }
  let ModelDecl::Object(object) = &applied["A"] else {
    panic!("A must stay an object");
  };
  assert!(object.fields[0].boxed);
  Ok(())
}

#[test]
fn test_alias_only_cycle_is_rejected() {
  let graph = models(vec![
    ModelDecl::Alias(AliasDef {
      name: "Left".to_string(),
      target: TypeRef::named("Right"),
      docs: None,
    }),
    ModelDecl::Alias(AliasDef {
      name: "Right".to_string(),
      target: TypeRef::named("Left"),
      docs: None,
    }),
  ]);
  let error = plan_boxing(&single(&graph)).unwrap_err();
  assert!(matches!(error, GeneratorError::UnsupportedSchemaType(ref names) if names == "Left -> Right"));
}

use crate::generator::{
  GeneratorOptions,
  ast::{AliasDef, ModelDecl, Primitive, TypeRef},
  errors::GeneratorError,
  session::{Origin, Session},
  tests::support::{compile, documents, with_paths, with_schemas},
};

#[test]
fn test_inline_model_colliding_with_component_is_rejected() {
  let schemas = r"
    Pet:
      type: object
      properties:
        owner:
          type: object
          properties:
            name:
              type: string
    PetOwner:
      type: string
";
  let error = compile(&with_schemas(schemas)).unwrap_err();
  let GeneratorError::NameCollision { name, first, second } = error else {
    panic!("expected a name collision, got {error}");
  };
  assert_eq!(name, "PetOwner");
  assert_eq!(first, "component schema PetOwner");
  assert_eq!(second, "property owner of Pet");
}

#[test]
fn test_duplicate_operation_names_are_rejected() {
  let paths = r"
  /a:
    get:
      operationId: fetch
      responses: {}
  /b:
    get:
      operationId: fetch
      responses: {}
";
  let error = compile(&with_paths(paths, "")).unwrap_err();
  assert!(
    matches!(error, GeneratorError::NameCollision { ref name, .. } if name == "FetchHandler"),
    "unexpected error {error}"
  );
}

#[test]
fn test_reservation_rules() -> anyhow::Result<()> {
  let documents = documents(&with_schemas("    Pet:\n      type: string\n"));
  let options = GeneratorOptions::default();
  let mut session = Session::new(&documents, documents.root()?, &options)?;

  session.reserve("Pet", Origin::Component("Pet".to_string()))?;
  assert!(session.reserve("Pet", Origin::Items { parent: "Pets".to_string() }).is_err());

  let unreserved = ModelDecl::Alias(AliasDef {
    name: "Ghost".to_string(),
    target: TypeRef::Primitive(Primitive::String),
    docs: None,
  });
  assert!(matches!(
    session.insert_model(unreserved),
    Err(GeneratorError::GenerationInvariant(_))
  ));

  session.reserve_handler_name("PetHandler", "GET /pets")?;
  assert!(session.reserve_handler_name("PetHandler", "GET /pets/{id}").is_err());
  Ok(())
}

use crate::generator::{
  GeneratorOptions,
  ast::{FieldDef, FormatDirective, ModelDecl, ValidationDirective as V, directive_summary},
  constraints::Presence,
  metrics::GenerationWarning,
  session::CompiledUnit,
  tests::support::{compile, compile_with, with_schemas},
};

fn field<'u>(unit: &'u CompiledUnit, model: &str, key: &str) -> &'u FieldDef {
  let Some(ModelDecl::Object(object)) = unit.models.get(model) else {
    panic!("{model} is not an object model");
  };
  object
    .fields
    .iter()
    .find(|field| field.key == key)
    .unwrap_or_else(|| panic!("{model} has no field {key}"))
}

const CONSTRAINED: &str = r"
    Account:
      type: object
      required: [handle, score, email]
      properties:
        handle:
          type: string
          minLength: 3
          maxLength: 20
          pattern: '^[a-z]+$'
        score:
          type: integer
          minimum: 0
          maximum: 100
          multipleOf: 5
        email:
          type: string
          format: email
        nickname:
          type: string
          minLength: 0
        status:
          type: string
          enum: [active, on hold]
        tags:
          type: array
          minItems: 1
          maxItems: 5
          uniqueItems: true
          items:
            type: string
            maxLength: 10
        ratio:
          type: number
          minimum: 0.5
        plain:
          type: array
          items:
            type: boolean
";

#[test]
fn test_presence_table() {
  let cases = [
    (false, false, false, Presence::OmitIfAbsent),
    (false, true, false, Presence::OmitIfAbsent),
    (true, false, false, Presence::Required),
    (true, true, false, Presence::Unconstrained),
    (true, false, true, Presence::OmitIfAbsent),
    (true, true, true, Presence::OmitIfAbsent),
  ];
  for (required, nullable, as_optional, expected) in cases {
    assert_eq!(
      Presence::for_field(required, nullable, as_optional),
      expected,
      "required={required} nullable={nullable} required_as_optional={as_optional}"
    );
  }
}

#[test]
fn test_scalar_and_array_directives() -> anyhow::Result<()> {
  let unit = compile(&with_schemas(CONSTRAINED))?;
  let cases: [(&str, Vec<V>); 8] = [
    ("handle", vec![V::Required, V::LengthMin(3), V::LengthMax(20)]),
    ("score", vec![V::Required, V::NumericMin(0.0), V::NumericMax(100.0)]),
    ("email", vec![V::Required, V::Format(FormatDirective::Email)]),
    ("nickname", vec![V::OmitIfAbsent]),
    (
      "status",
      vec![V::OmitIfAbsent, V::OneOf(vec!["active".to_string(), "on hold".to_string()])],
    ),
    (
      "tags",
      vec![
        V::OmitIfAbsent,
        V::ItemsMin(1),
        V::ItemsMax(5),
        V::Unique,
        V::Dive,
        V::LengthMax(10),
      ],
    ),
    ("ratio", vec![V::OmitIfAbsent, V::NumericMin(0.5)]),
    ("plain", vec![V::OmitIfAbsent]),
  ];
  for (key, expected) in cases {
    assert_eq!(field(&unit, "Account", key).directives, expected, "directives of {key}");
  }
  Ok(())
}

#[test]
fn test_directive_summary_quotes_whitespace() -> anyhow::Result<()> {
  let unit = compile(&with_schemas(CONSTRAINED))?;
  assert_eq!(
    directive_summary(&field(&unit, "Account", "status").directives),
    "omitempty,oneof=active 'on hold'"
  );
  assert_eq!(
    directive_summary(&field(&unit, "Account", "tags").directives),
    "omitempty,min=1,max=5,unique,dive,max=10"
  );
  Ok(())
}

#[test]
fn test_unsupported_constraints_become_warnings() -> anyhow::Result<()> {
  let unit = compile(&with_schemas(CONSTRAINED))?;
  assert_eq!(
    unit.warnings,
    vec![
      GenerationWarning::UnsupportedConstraint {
        location: "Account.handle".to_string(),
        constraint: "pattern".to_string(),
      },
      GenerationWarning::UnsupportedConstraint {
        location: "Account.score".to_string(),
        constraint: "multipleOf".to_string(),
      },
    ]
  );
  assert_eq!(
    unit.warnings[0].to_string(),
    "Account.handle: pattern constraint is not enforced"
  );
  Ok(())
}

#[test]
fn test_reference_constraints_follow_target() -> anyhow::Result<()> {
  let schemas = r"
    Code:
      type: string
      minLength: 2
    Holder:
      type: object
      required: [code, note]
      properties:
        code:
          $ref: '#/components/schemas/Code'
        note:
          nullable: true
          allOf:
            - $ref: '#/components/schemas/Code'
";
  let unit = compile(&with_schemas(schemas))?;
  assert_eq!(field(&unit, "Holder", "code").directives, vec![V::Required, V::LengthMin(2)]);

  let note = field(&unit, "Holder", "note");
  assert!(note.nullable);
  assert!(note.optional_repr);
  assert_eq!(note.directives, vec![V::LengthMin(2)]);
  Ok(())
}

#[test]
fn test_required_as_optional() -> anyhow::Result<()> {
  let options = GeneratorOptions {
    required_as_optional: true,
    ..GeneratorOptions::default()
  };
  let unit = compile_with(&with_schemas(CONSTRAINED), &options)?;
  let handle = field(&unit, "Account", "handle");
  assert!(handle.required);
  assert!(handle.optional_repr);
  assert_eq!(handle.directives[0], V::OmitIfAbsent);
  Ok(())
}

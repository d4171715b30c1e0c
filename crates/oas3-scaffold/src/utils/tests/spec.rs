use std::path::Path;

use crate::{
  generator::errors::GeneratorError,
  utils::spec::{DocumentSet, SpecFormat, SpecLoader},
};

const ROOT: &str = r##"
openapi: 3.0.3
info:
  title: Pets
  version: 1.0.0
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        owner:
          $ref: "shared/common.yaml#/components/schemas/Owner"
"##;

const COMMON: &str = r##"
openapi: 3.0.3
info:
  title: Common
  version: 1.0.0
paths: {}
components:
  schemas:
    Owner:
      type: object
      properties:
        name:
          type: string
"##;

#[test]
fn test_spec_format_from_extension() {
  let cases = [
    ("yaml", SpecFormat::Yaml),
    ("yml", SpecFormat::Yaml),
    ("json", SpecFormat::Json),
    ("txt", SpecFormat::Json),
  ];
  for (ext, expected) in cases {
    assert_eq!(SpecFormat::from_extension(ext), expected, "failed for {ext:?}");
  }
}

#[test]
fn test_document_set_follows_references() -> anyhow::Result<()> {
  let set = DocumentSet::from_sources(
    "specs/pets.yaml",
    [("specs/pets.yaml", ROOT), ("specs/shared/common.yaml", COMMON)],
  )?;
  assert_eq!(set.len(), 2);
  let root = set.root()?;
  assert_eq!(root.unit, "pets");
  let common = set.resolve_file(root, "shared/common.yaml")?;
  assert_eq!(common.unit, "common");
  assert_eq!(common.spec.info.title, "Common");
  assert!(set.by_unit("common").is_some());
  Ok(())
}

#[test]
fn test_document_set_rejects_missing_document() {
  let result = DocumentSet::from_sources("specs/pets.yaml", [("specs/pets.yaml", ROOT)]);
  assert!(matches!(result, Err(GeneratorError::SpecValidation { .. })));
}

#[test]
fn test_document_set_rejects_non_v3() {
  let swagger = "swagger: '2.0'\ninfo:\n  title: Old\n  version: '1'\npaths: {}\n";
  let result = DocumentSet::from_sources("old.yaml", [("old.yaml", swagger)]);
  let Err(GeneratorError::SpecValidation { message, .. }) = result else {
    panic!("expected a validation error");
  };
  assert!(message.contains("expected 3.x"), "unexpected message {message}");
}

#[tokio::test]
async fn test_spec_loader_reads_json_file() -> anyhow::Result<()> {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("tiny.json");
  tokio::fs::write(
    &path,
    r#"{"openapi":"3.0.0","info":{"title":"Tiny","version":"0.1.0"},"paths":{}}"#,
  )
  .await?;
  let spec = SpecLoader::open(&path).await?.parse()?;
  assert_eq!(spec.info.title, "Tiny");

  let set = DocumentSet::load(Path::new(&path)).await?;
  assert_eq!(set.root()?.unit, "tiny");
  Ok(())
}

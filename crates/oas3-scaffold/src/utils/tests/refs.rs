use std::{collections::BTreeSet, path::Path};

use serde_json::json;

use crate::utils::refs::{
  ComponentKind, ComponentRef, collect_document_refs, document_part, parse_component_ref, resolve_document_path,
};

#[test]
fn test_parse_component_ref() {
  let cases = [
    (
      "#/components/schemas/Pet",
      Some(ComponentRef {
        file: None,
        kind: ComponentKind::Schemas,
        name: "Pet".to_string(),
      }),
    ),
    (
      "common.yaml#/components/parameters/Limit",
      Some(ComponentRef {
        file: Some("common.yaml"),
        kind: ComponentKind::Parameters,
        name: "Limit".to_string(),
      }),
    ),
    (
      "#/components/requestBodies/a~1b~0c",
      Some(ComponentRef {
        file: None,
        kind: ComponentKind::RequestBodies,
        name: "a/b~c".to_string(),
      }),
    ),
    ("#/components/examples/Pet", None),
    ("#/definitions/Pet", None),
    ("#/components/schemas/Pet/properties/name", None),
    ("common.yaml", None),
  ];
  for (input, expected) in cases {
    assert_eq!(parse_component_ref(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_document_part() {
  assert_eq!(document_part("common.yaml#/components/schemas/Pet"), Some("common.yaml"));
  assert_eq!(document_part("common.yaml"), Some("common.yaml"));
  assert_eq!(document_part("#/components/schemas/Pet"), None);
}

#[test]
fn test_collect_document_refs() {
  let document = json!({
    "paths": {
      "/pets": {
        "get": {
          "parameters": [{ "$ref": "shared/params.yaml#/components/parameters/Limit" }],
          "responses": { "200": { "$ref": "#/components/responses/Ok" } }
        }
      }
    },
    "components": { "schemas": { "Pet": { "$ref": "common.yaml#/components/schemas/Pet" } } }
  });
  let mut files = BTreeSet::new();
  collect_document_refs(&document, &mut files);
  assert_eq!(
    files,
    BTreeSet::from(["common.yaml".to_string(), "shared/params.yaml".to_string()])
  );
}

#[test]
fn test_resolve_document_path() {
  let cases = [
    ("specs/api.yaml", "common.yaml", "specs/common.yaml"),
    ("specs/api.yaml", "./shared/common.yaml", "specs/shared/common.yaml"),
    ("specs/v1/api.yaml", "../common.yaml", "specs/common.yaml"),
    ("api.yaml", "../../common.yaml", "../../common.yaml"),
  ];
  for (referrer, file, expected) in cases {
    assert_eq!(
      resolve_document_path(Path::new(referrer), file),
      Path::new(expected),
      "failed for {referrer} -> {file}"
    );
  }
}

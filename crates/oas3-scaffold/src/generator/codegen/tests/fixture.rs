use std::path::Path;

use crate::generator::tests::support::generate;

/// Set to rewrite the checked-in fixture with the generator's exact output.
const REFRESH_VAR: &str = "OAS3_SCAFFOLD_REFRESH_FIXTURE";

/// A file of the generated unit that `oas3-scaffold-support/tests/generated_service.rs` drives.
macro_rules! checked_in {
  ($file:literal) => {
    include_str!(concat!(
      env!("CARGO_MANIFEST_DIR"),
      "/../oas3-scaffold-support/tests/api/",
      $file
    ))
  };
}

/// Reprints a source file, so only changes to the syntax tree or its comments count.
fn reprinted(source: &str) -> String {
  let file = syn::parse_file(source).expect("source must parse");
  prettyplease::unparse(&file)
}

#[test]
fn test_checked_in_fixture_matches_generator() {
  let output = generate(checked_in!("api.yaml")).unwrap();
  let [unit] = &output.units[..] else {
    panic!("expected a single unit");
  };
  assert_eq!(unit.unit, "api");

  for (name, generated, checked_in) in [
    ("mod.rs", &unit.sources.module, checked_in!("mod.rs")),
    ("models.rs", &unit.sources.models, checked_in!("models.rs")),
    ("handlers.rs", &unit.sources.handlers, checked_in!("handlers.rs")),
  ] {
    if std::env::var_os(REFRESH_VAR).is_some() {
      let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../oas3-scaffold-support/tests/api").join(name);
      std::fs::write(&path, generated).expect("fixture must be writable");
      continue;
    }
    assert_eq!(
      reprinted(generated),
      reprinted(checked_in),
      "tests/api/{name} is stale, rerun with {REFRESH_VAR}=1"
    );
  }
}

#[test]
fn test_checked_in_fixture_keeps_the_generated_header() {
  let output = generate(checked_in!("api.yaml")).unwrap();
  let header = "//! AUTO-GENERATED CODE - DO NOT EDIT!\n//!\n//! Pet Store 1.0.0\n//! Source: api.yaml\n";
  for source in [&output.units[0].sources.models, &output.units[0].sources.handlers] {
    assert!(source.starts_with(header), "{source}");
  }
  for checked_in in [checked_in!("mod.rs"), checked_in!("models.rs"), checked_in!("handlers.rs")] {
    assert!(checked_in.starts_with(header));
  }
}

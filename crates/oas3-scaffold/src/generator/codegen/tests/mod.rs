mod fixture;

use quote::quote;

use super::{CodeMetadata, doc_attrs, format_tokens};
use crate::generator::errors::GeneratorError;

#[test]
fn test_header_lists_document_and_description() {
  let metadata = CodeMetadata {
    title: "Pet Store".to_string(),
    version: "2.1.0".to_string(),
    description: Some("Manages pets.\n\nSecond paragraph.  ".to_string()),
    source: "specs/pets.yaml".to_string(),
  };
  let header = metadata.header();
  assert!(header.starts_with("//! AUTO-GENERATED CODE - DO NOT EDIT!\n"));
  assert!(header.contains("//! Pet Store 2.1.0\n"));
  assert!(header.contains("//! Source: specs/pets.yaml\n"));
  assert!(header.contains("//! Manages pets.\n//!\n//! Second paragraph.\n"));

  let bare = CodeMetadata {
    description: Some("   ".to_string()),
    ..metadata
  };
  assert!(bare.header().ends_with("//! Generated by `oas3-scaffold`\n"));
}

#[test]
fn test_doc_attrs() {
  assert!(doc_attrs(None).is_empty());
  assert!(doc_attrs(Some("  \n ")).is_empty());

  let rendered = doc_attrs(Some("  First line\nSecond line  ")).to_string();
  assert!(rendered.contains("\" First line\""), "{rendered}");
  assert!(rendered.contains("\" Second line\""), "{rendered}");
  assert_eq!(rendered.matches("doc").count(), 2);
}

#[test]
fn test_format_tokens_rejects_invalid_items() {
  let formatted = format_tokens(quote! { pub type Id = String; }).unwrap();
  assert_eq!(formatted, "pub type Id = String;\n");

  let error = format_tokens(quote! { let id = 1; }).unwrap_err();
  assert!(matches!(error, GeneratorError::GenerationInvariant(_)), "got {error}");
}

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::doc_attrs;
use crate::generator::{
  ast::{
    AliasDef, ArrayDef, ExternalImport, FieldDef, ModelDecl, ObjectDef, Scope, ValidationDirective, directive_summary,
  },
  deep_validation::DeepValidatorDef,
  session::CompiledUnit,
};

/// The data-model file of a unit: declarations followed by deep validators.
pub(crate) struct ModelsFile<'u> {
  pub unit: &'u CompiledUnit,
  pub validators: &'u [DeepValidatorDef],
  pub import_prefix: &'u str,
}

impl ToTokens for ModelsFile<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let models = self.unit.models.values();
    let has_structs = models.clone().any(|model| matches!(model, ModelDecl::Object(_)));

    let support_import = (has_structs || !self.validators.is_empty()).then(|| quote! { use oas3_scaffold_support as support; });
    let serde_import = has_structs.then(|| quote! { use serde::{Deserialize, Serialize}; });
    let timestamp_import = models
      .clone()
      .any(ModelDecl::uses_timestamp)
      .then(|| quote! { use oas3_scaffold_support::Timestamp; });

    let external_units: BTreeSet<String> = models.clone().flat_map(ModelDecl::external_units).collect();
    let external_imports = external_units.iter().map(|unit| ExternalImport {
      prefix: self.import_prefix,
      unit,
    });

    let declarations = models.map(ModelFragment);
    let validators = self.validators;

    tokens.extend(quote! {
      #support_import
      #serde_import
      #timestamp_import
      #(#external_imports)*

      #(#declarations)*

      #(#validators)*
    });
  }
}

struct ModelFragment<'m>(&'m ModelDecl);

impl ToTokens for ModelFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    match self.0 {
      ModelDecl::Object(def) => ObjectFragment(def).to_tokens(tokens),
      ModelDecl::Array(ArrayDef { name, item, docs }) => {
        let name = format_ident!("{name}");
        let docs = doc_attrs(docs.as_deref());
        let item = item.render(Scope::Models);
        tokens.extend(quote! {
          #docs
          pub type #name = Vec<#item>;
        });
      }
      ModelDecl::Alias(AliasDef { name, target, docs }) => {
        let name = format_ident!("{name}");
        let docs = doc_attrs(docs.as_deref());
        let target = target.render(Scope::Models);
        tokens.extend(quote! {
          #docs
          pub type #name = #target;
        });
      }
    }
  }
}

struct ObjectFragment<'m>(&'m ObjectDef);

impl ToTokens for ObjectFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let def = self.0;
    let name = format_ident!("{}", def.name);
    let docs = doc_attrs(def.docs.as_deref());
    let fields = def.fields.iter().map(FieldFragment);

    let checks: Vec<TokenStream> = def
      .fields
      .iter()
      .map(|field| {
        let key = &field.key;
        let ident = format_ident!("{}", field.ident);
        let rules = &field.directives;
        quote! { report.field(#key, &self.#ident, &[#(#rules),*]); }
      })
      .collect();
    let validate_body = if checks.is_empty() {
      quote! { support::Report::new().finish() }
    } else {
      quote! {
        let mut report = support::Report::new();
        #(#checks)*
        report.finish()
      }
    };

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
      pub struct #name {
        #(#fields),*
      }

      impl support::Validate for #name {
        fn validate(&self) -> Result<(), support::ValidationErrors> {
          #validate_body
        }
      }

      impl support::Inspect for #name {
        fn inspect(&self) -> support::Subject<'_> {
          support::Subject::Model(self)
        }
      }
    });
  }
}

struct FieldFragment<'m>(&'m FieldDef);

impl ToTokens for FieldFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let field = self.0;
    let ident = format_ident!("{}", field.ident);
    let key = &field.key;

    let summary = (!field.directives.is_empty()).then(|| {
      let line = format!(" Validation: `{}`", directive_summary(&field.directives));
      quote! { #[doc = #line] }
    });

    let omit = field.directives.contains(&ValidationDirective::OmitIfAbsent);
    let renamed = field.ident.trim_start_matches("r#") != key;
    let serde = match (renamed, omit) {
      (true, true) => quote! { #[serde(rename = #key, default, skip_serializing_if = "Option::is_none")] },
      (false, true) => quote! { #[serde(default, skip_serializing_if = "Option::is_none")] },
      (true, false) => quote! { #[serde(rename = #key)] },
      (false, false) => quote! {},
    };

    let mut ty = field.ty.render(Scope::Models);
    if field.boxed {
      ty = quote! { Box<#ty> };
    }
    if field.optional_repr {
      ty = quote! { Option<#ty> };
    }

    tokens.extend(quote! {
      #summary
      #serde
      pub #ident: #ty
    });
  }
}

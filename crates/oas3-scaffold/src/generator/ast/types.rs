use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

/// Scalar types a schema or parameter can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
  String,
  I32,
  I64,
  F64,
  Bool,
  Timestamp,
}

/// Which generated file a type is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  Models,
  Handlers,
}

/// Reference to a generated or built-in type, relative to the unit that declares it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeRef {
  Primitive(Primitive),
  Named(String),
  External { unit: String, name: String },
}

impl TypeRef {
  pub fn named(name: impl Into<String>) -> Self {
    Self::Named(name.into())
  }

  pub fn uses_timestamp(&self) -> bool {
    match self {
      Self::Primitive(primitive) => *primitive == Primitive::Timestamp,
      Self::Named(_) | Self::External { .. } => false,
    }
  }

  pub fn collect_external_units(&self, units: &mut BTreeSet<String>) {
    match self {
      Self::External { unit, .. } => {
        units.insert(unit.clone());
      }
      Self::Primitive(_) | Self::Named(_) => {}
    }
  }

  pub fn render(&self, scope: Scope) -> TokenStream {
    match self {
      Self::Primitive(primitive) => match (primitive, scope) {
        (Primitive::String, _) => quote! { String },
        (Primitive::I32, _) => quote! { i32 },
        (Primitive::I64, _) => quote! { i64 },
        (Primitive::F64, _) => quote! { f64 },
        (Primitive::Bool, _) => quote! { bool },
        (Primitive::Timestamp, Scope::Models) => quote! { Timestamp },
        (Primitive::Timestamp, Scope::Handlers) => quote! { support::Timestamp },
      },
      Self::Named(name) => {
        let ident = format_ident!("{name}");
        match scope {
          Scope::Models => quote! { #ident },
          Scope::Handlers => quote! { models::#ident },
        }
      }
      Self::External { unit, name } => {
        let module = external_models_module(unit);
        let ident = format_ident!("{name}");
        quote! { #module::#ident }
      }
    }
  }
}

impl From<Primitive> for TypeRef {
  fn from(primitive: Primitive) -> Self {
    Self::Primitive(primitive)
  }
}

/// Alias under which another unit's models module is imported.
pub fn external_models_module(unit: &str) -> proc_macro2::Ident {
  format_ident!("{unit}_models")
}

/// `use <prefix>::<unit>::models as <unit>_models;`
pub struct ExternalImport<'a> {
  pub prefix: &'a str,
  pub unit: &'a str,
}

impl ToTokens for ExternalImport<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let path: TokenStream = self
      .prefix
      .split("::")
      .filter(|segment| !segment.is_empty())
      .map(|segment| {
        let ident = format_ident!("{segment}");
        quote! { #ident:: }
      })
      .collect();
    let unit = format_ident!("{}", self.unit);
    let alias = external_models_module(self.unit);
    tokens.extend(quote! { use #path #unit::models as #alias; });
  }
}

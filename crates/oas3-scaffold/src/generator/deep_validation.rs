use std::collections::{BTreeMap, BTreeSet};

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use crate::generator::{
  ast::{ModelDecl, Scope, TypeRef, external_models_module},
  naming::identifiers::{ensure_unique, function_stem},
  session::CompiledUnit,
};

/// Models and validator function names of every compiled unit.
pub(crate) struct ModelIndex<'c> {
  units: BTreeMap<&'c str, UnitModels<'c>>,
}

struct UnitModels<'c> {
  models: &'c BTreeMap<String, ModelDecl>,
  functions: BTreeMap<&'c str, String>,
}

/// A deep validator function, possibly living in another unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatorRef {
  pub unit: String,
  pub function: String,
}

impl ValidatorRef {
  /// Path to the function as seen from `from_unit`'s file of kind `scope`.
  pub(crate) fn path(&self, from_unit: &str, scope: Scope) -> TokenStream {
    let function = format_ident!("{}", self.function);
    if self.unit != from_unit {
      let module = external_models_module(&self.unit);
      return quote! { #module::#function };
    }
    match scope {
      Scope::Models => quote! { #function },
      Scope::Handlers => quote! { models::#function },
    }
  }
}

impl<'c> ModelIndex<'c> {
  pub(crate) fn new(units: &'c [CompiledUnit]) -> Self {
    let units = units
      .iter()
      .map(|unit| {
        let mut used = BTreeSet::new();
        let functions = unit
          .models
          .keys()
          .map(|name| {
            let base = format!("validate_{}_json", function_stem(name).trim_start_matches("r#"));
            let function = ensure_unique(&base, &used);
            used.insert(function.clone());
            (name.as_str(), function)
          })
          .collect();
        (
          unit.unit.as_str(),
          UnitModels {
            models: &unit.models,
            functions,
          },
        )
      })
      .collect();
    Self { units }
  }

  /// Whether `unit` declares a model called `name`.
  pub(crate) fn contains(&self, unit: &str, name: &str) -> bool {
    self.units.get(unit).is_some_and(|models| models.models.contains_key(name))
  }

  fn lookup(&self, unit: &'c str, ty: &'c TypeRef) -> Option<(&'c str, &'c str, &'c ModelDecl)> {
    let (unit, name) = match ty {
      TypeRef::Named(name) => (unit, name.as_str()),
      TypeRef::External { unit, name } => (unit.as_str(), name.as_str()),
      TypeRef::Primitive(_) => return None,
    };
    let models = self.units.get(unit)?;
    let (name, model) = models.models.get_key_value(name)?;
    Some((unit, name.as_str(), model))
  }

  fn function(&self, unit: &str, name: &str) -> Option<ValidatorRef> {
    let function = self.units.get(unit)?.functions.get(name)?;
    Some(ValidatorRef {
      unit: unit.to_string(),
      function: function.clone(),
    })
  }

  /// Validator for values of `ty`, when one is generated.
  pub(crate) fn validator_for(&self, unit: &'c str, ty: &'c TypeRef) -> Option<ValidatorRef> {
    self.validator_inner(unit, ty, &mut BTreeSet::new())
  }

  fn validator_inner(
    &self,
    unit: &'c str,
    ty: &'c TypeRef,
    visited: &mut BTreeSet<(&'c str, &'c str)>,
  ) -> Option<ValidatorRef> {
    let (unit, name, model) = self.lookup(unit, ty)?;
    if !visited.insert((unit, name)) {
      return None;
    }
    match model {
      ModelDecl::Object(_) | ModelDecl::Array(_) => self.function(unit, name),
      ModelDecl::Alias(alias) => self
        .validator_inner(unit, &alias.target, visited)
        .and_then(|_| self.function(unit, name)),
    }
  }

  /// Whether values of `ty` contain an object, directly or through lists.
  pub(crate) fn needs_deep(&self, unit: &'c str, ty: &'c TypeRef) -> bool {
    self.needs_deep_inner(unit, ty, &mut BTreeSet::new())
  }

  fn needs_deep_inner(&self, unit: &'c str, ty: &'c TypeRef, visited: &mut BTreeSet<(&'c str, &'c str)>) -> bool {
    let Some((unit, name, model)) = self.lookup(unit, ty) else {
      return false;
    };
    if !visited.insert((unit, name)) {
      return false;
    }
    match model {
      ModelDecl::Object(_) => true,
      ModelDecl::Array(array) => self.needs_deep_inner(unit, &array.item, visited),
      ModelDecl::Alias(alias) => self.needs_deep_inner(unit, &alias.target, visited),
    }
  }

  /// Plans the validators of one unit, ordered by model name.
  pub(crate) fn plan_unit(&self, unit: &'c CompiledUnit) -> Vec<DeepValidatorDef> {
    let unit_name = unit.unit.as_str();
    unit
      .models
      .iter()
      .filter_map(|(name, model)| {
        let function = self.function(unit_name, name)?.function;
        let kind = match model {
          ModelDecl::Object(object) => {
            let mut required: Vec<String> = object
              .fields
              .iter()
              .filter(|field| field.required)
              .map(|field| field.key.clone())
              .collect();
            required.sort();
            let mut nullable: Vec<String> = object
              .fields
              .iter()
              .filter(|field| field.required && field.nullable)
              .map(|field| field.key.clone())
              .collect();
            nullable.sort();
            let nested = object
              .fields
              .iter()
              .filter(|field| self.needs_deep(unit_name, &field.ty))
              .filter_map(|field| Some((field.key.clone(), self.validator_for(unit_name, &field.ty)?)))
              .collect();
            ValidatorKind::Object {
              required,
              nullable,
              nested,
            }
          }
          ModelDecl::Array(array) => ValidatorKind::Array {
            element: self
              .needs_deep(unit_name, &array.item)
              .then(|| self.validator_for(unit_name, &array.item))
              .flatten(),
          },
          ModelDecl::Alias(alias) => ValidatorKind::Forward {
            target: self.validator_for(unit_name, &alias.target)?,
          },
        };
        Some(DeepValidatorDef {
          unit: unit_name.to_string(),
          model: name.clone(),
          function,
          kind,
        })
      })
      .collect()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValidatorKind {
  Object {
    required: Vec<String>,
    nullable: Vec<String>,
    nested: Vec<(String, ValidatorRef)>,
  },
  Array {
    element: Option<ValidatorRef>,
  },
  Forward {
    target: ValidatorRef,
  },
}

/// A `validate_<model>_json(&Value)` function of the data-model unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeepValidatorDef {
  pub unit: String,
  pub model: String,
  pub function: String,
  pub kind: ValidatorKind,
}

impl ToTokens for DeepValidatorDef {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let function = format_ident!("{}", self.function);
    let doc = format!(" Checks a raw `{}` document before it is decoded.", self.model);
    let nested_path = |target: &ValidatorRef| target.path(&self.unit, Scope::Models);

    let (param, body) = match &self.kind {
      ValidatorKind::Object { required, nested, .. } if required.is_empty() && nested.is_empty() => {
        (format_ident!("_value"), quote! { Ok(()) })
      }
      ValidatorKind::Object {
        required,
        nullable,
        nested,
      } => {
        let presence = (!required.is_empty()).then(|| {
          quote! {
            const REQUIRED: &[&str] = &[#(#required),*];
            const NULLABLE: &[&str] = &[#(#nullable),*];
            support::deep::check_required(object, REQUIRED, NULLABLE)?;
          }
        });
        let checks = nested.iter().map(|(key, target)| {
          let path = nested_path(target);
          quote! { support::deep::check_field(object, #key, #path)?; }
        });
        (
          format_ident!("value"),
          quote! {
            let object = support::deep::as_object(value)?;
            #presence
            #(#checks)*
            Ok(())
          },
        )
      }
      ValidatorKind::Array { element: Some(target) } => {
        let path = nested_path(target);
        (format_ident!("value"), quote! { support::deep::check_elements(value, #path) })
      }
      ValidatorKind::Array { element: None } => (format_ident!("_value"), quote! { Ok(()) }),
      ValidatorKind::Forward { target } => {
        let path = nested_path(target);
        (format_ident!("value"), quote! { #path(value) })
      }
    };

    tokens.extend(quote! {
      #[doc = #doc]
      pub fn #function(#param: &support::serde_json::Value) -> Result<(), support::RequestError> {
        #body
      }
    });
  }
}

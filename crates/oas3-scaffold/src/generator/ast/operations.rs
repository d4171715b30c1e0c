use http::Method;
use strum::Display;

use super::{Primitive, TypeRef};
use crate::generator::naming::identifiers::binding_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParamLocation {
  Path,
  Query,
  Header,
  Cookie,
}

impl ParamLocation {
  pub const ALL: [Self; 4] = [Self::Path, Self::Query, Self::Header, Self::Cookie];

  /// Suffix of the parameter model generated for this location.
  pub fn model_suffix(self) -> &'static str {
    match self {
      Self::Path => "PathParams",
      Self::Query => "QueryParams",
      Self::Header => "Headers",
      Self::Cookie => "Cookies",
    }
  }

  /// Field of the request envelope holding this group.
  pub fn request_field(self) -> &'static str {
    match self {
      Self::Path => "path",
      Self::Query => "query",
      Self::Header => "headers",
      Self::Cookie => "cookies",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
  pub location: ParamLocation,
  pub name: String,
  /// Binding of the matching field in the group model.
  pub ident: String,
  pub primitive: Primitive,
  pub required: bool,
  pub optional_repr: bool,
}

/// Parameters of one location, parsed into a single model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterGroup {
  pub location: ParamLocation,
  pub model: String,
  pub params: Vec<ParameterDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyDescriptor {
  pub ty: TypeRef,
  pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
  pub status: u16,
  pub body: Option<TypeRef>,
  /// Header model for this status, when headers are declared.
  pub headers: Option<String>,
}

/// The trait an implementer provides for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityContract {
  pub trait_name: String,
  pub method: String,
  pub request: String,
  pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
  pub method: Method,
  pub path: String,
  pub handler: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
  /// Type-name stem every generated item of this operation derives from.
  pub base: String,
  pub binding: String,
  pub method: Method,
  pub path: String,
  pub operation_id: Option<String>,
  pub parameters: Vec<ParameterGroup>,
  pub body: Option<RequestBodyDescriptor>,
  pub responses: Vec<ResponseDescriptor>,
  pub contract: CapabilityContract,
  pub route: RouteBinding,
}

impl OperationDescriptor {
  pub fn new(base: String, method: Method, path: String, operation_id: Option<String>) -> Self {
    let binding = binding_name(&base);
    let contract = CapabilityContract {
      trait_name: format!("{base}Handler"),
      method: format!("handle_{binding}"),
      request: format!("{base}Request"),
      response: format!("{base}Response"),
    };
    let route = RouteBinding {
      method: method.clone(),
      path: path.clone(),
      handler: binding.clone(),
    };
    Self {
      base,
      binding,
      method,
      path,
      operation_id,
      parameters: vec![],
      body: None,
      responses: vec![],
      contract,
      route,
    }
  }

  /// `METHOD /path`, used in diagnostics.
  pub fn label(&self) -> String {
    format!("{} {}", self.method, self.path)
  }

  pub fn response_slot(&self, status: u16) -> String {
    format!("{}Response{status}", self.base)
  }

  pub fn referenced_types(&self) -> impl Iterator<Item = &TypeRef> {
    self
      .body
      .iter()
      .map(|body| &body.ty)
      .chain(self.responses.iter().filter_map(|response| response.body.as_ref()))
  }
}

use std::collections::{BTreeMap, BTreeSet};

use http::Method;
use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, format_ident, quote};

use crate::generator::{
  ast::{
    ExternalImport, OperationDescriptor, ParamLocation, ParameterDescriptor, ParameterGroup, Primitive,
    RequestBodyDescriptor, ResponseDescriptor, Scope, TypeRef,
  },
  deep_validation::ModelIndex,
  session::CompiledUnit,
};

/// The handler file of a unit: request and response contracts, parsers, writers, capability
/// traits and the `Handler` that wires them into an axum router.
pub(crate) struct HandlersFile<'u> {
  pub unit: &'u CompiledUnit,
  pub index: &'u ModelIndex<'u>,
  pub import_prefix: &'u str,
}

impl HandlersFile<'_> {
  fn uses_models(&self) -> bool {
    self.unit.operations.iter().any(|op| {
      !op.parameters.is_empty()
        || op.responses.iter().any(|response| response.headers.is_some())
        || op.referenced_types().any(|ty| matches!(ty, TypeRef::Named(_)))
    })
  }

  fn external_units(&self) -> BTreeSet<String> {
    let mut units = BTreeSet::new();
    for op in &self.unit.operations {
      for ty in op.referenced_types() {
        ty.collect_external_units(&mut units);
      }
    }
    units
  }
}

impl ToTokens for HandlersFile<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let operations = &self.unit.operations;
    if operations.is_empty() {
      tokens.extend(quote! {
        use axum::Router;

        /// Registers no routes: the source document declares no operations.
        #[derive(Clone, Default)]
        pub struct Handler {}

        impl Handler {
          pub fn new() -> Self {
            Self {}
          }

          pub fn add_routes<S>(self, router: Router<S>) -> Router<S>
          where
            S: Clone + Send + Sync + 'static,
          {
            router
          }
        }
      });
      return;
    }

    // Only the first verb of each path is called as a free function; later ones chain as methods.
    let verbs: BTreeSet<String> = routes_by_path(operations)
      .values()
      .filter_map(|ops| ops.first())
      .map(|op| HttpMethodFragment(&op.route.method).to_token_stream().to_string())
      .collect();
    let verbs = verbs.iter().map(|verb| format_ident!("{verb}"));
    let models_import = self.uses_models().then(|| quote! { use super::models; });
    let external_units = self.external_units();
    let external_imports = external_units.iter().map(|unit| ExternalImport {
      prefix: self.import_prefix,
      unit,
    });

    let unit = self.unit.unit.as_str();
    let fragments = operations.iter().map(|op| OperationFragment {
      op,
      unit,
      index: self.index,
    });
    let handler = HandlerFragment { operations };

    tokens.extend(quote! {
      use std::sync::Arc;

      use axum::{
        RequestExt, Router,
        body::Body,
        extract::Request,
        http::request::Parts,
        response::Response,
        routing::{#(#verbs),*},
      };
      use oas3_scaffold_support as support;

      #models_import
      #(#external_imports)*

      #(#fragments)*

      #handler
    });
  }
}

fn snake(op: &OperationDescriptor, suffix: &str) -> proc_macro2::Ident {
  format_ident!("{}_{suffix}", op.binding.trim_start_matches("r#"))
}

fn status_literal(status: u16) -> Literal {
  Literal::u16_unsuffixed(status)
}

/// Every per-operation item except the router wiring.
struct OperationFragment<'u> {
  op: &'u OperationDescriptor,
  unit: &'u str,
  index: &'u ModelIndex<'u>,
}

impl ToTokens for OperationFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let op = self.op;
    RequestFragment(op).to_tokens(tokens);
    ResponseFragment(op).to_tokens(tokens);
    TraitFragment(op).to_tokens(tokens);
    RequestParserFragment(op).to_tokens(tokens);
    for group in &op.parameters {
      GroupParserFragment { op, group }.to_tokens(tokens);
    }
    if let Some(body) = &op.body {
      BodyParserFragment {
        op,
        body,
        unit: self.unit,
        index: self.index,
      }
      .to_tokens(tokens);
    }
    WriterFragment(op).to_tokens(tokens);
  }
}

struct RequestFragment<'u>(&'u OperationDescriptor);

impl ToTokens for RequestFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let op = self.0;
    let name = format_ident!("{}", op.contract.request);
    let doc = format!(" Parsed request of `{}`.", op.label());
    let groups = op.parameters.iter().map(|group| {
      let field = format_ident!("{}", group.location.request_field());
      let model = format_ident!("{}", group.model);
      quote! { pub #field: models::#model }
    });
    let body = op.body.as_ref().map(|body| {
      let ty = body_type(body);
      quote! { pub body: #ty }
    });
    let fields = groups.chain(body);
    tokens.extend(quote! {
      #[doc = #doc]
      #[derive(Debug, Clone, PartialEq)]
      pub struct #name {
        #(#fields),*
      }
    });
  }
}

fn body_type(body: &RequestBodyDescriptor) -> TokenStream {
  let ty = body.ty.render(Scope::Handlers);
  if body.required { ty } else { quote! { Option<#ty> } }
}

struct ResponseFragment<'u>(&'u OperationDescriptor);

impl ResponseFragment<'_> {
  fn slot_fields(response: &ResponseDescriptor) -> Vec<(proc_macro2::Ident, TokenStream)> {
    let body = response
      .body
      .as_ref()
      .map(|ty| (format_ident!("body"), ty.render(Scope::Handlers)));
    let headers = response.headers.as_ref().map(|model| {
      let model = format_ident!("{model}");
      (format_ident!("headers"), quote! { models::#model })
    });
    body.into_iter().chain(headers).collect()
  }
}

impl ToTokens for ResponseFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let op = self.0;
    let envelope = format_ident!("{}", op.contract.response);
    let doc = format!(
      " Response of `{}`: set exactly one slot, matching `status_code`.",
      op.label()
    );

    let mut slots = vec![];
    let mut envelope_fields = vec![];
    let mut constructors = vec![];
    for response in &op.responses {
      let slot = format_ident!("{}", op.response_slot(response.status));
      let slot_field = format_ident!("response_{}", response.status);
      let fields = Self::slot_fields(response);
      let field_decls = fields.iter().map(|(ident, ty)| quote! { pub #ident: #ty });
      let params = fields.iter().map(|(ident, ty)| quote! { #ident: #ty });
      let inits = fields.iter().map(|(ident, _)| ident);
      slots.push(quote! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct #slot {
          #(#field_decls),*
        }
      });
      envelope_fields.push(quote! { pub #slot_field: Option<#slot> });

      let constructor = format_ident!("status_{}", response.status);
      let status = status_literal(response.status);
      let rest = (op.responses.len() > 1).then(|| quote! { ..Self::default() });
      constructors.push(quote! {
        pub fn #constructor(#(#params),*) -> Self {
          Self {
            status_code: #status,
            #slot_field: Some(#slot { #(#inits),* }),
            #rest
          }
        }
      });
    }

    tokens.extend(quote! {
      #(#slots)*

      #[doc = #doc]
      #[derive(Debug, Clone, Default, PartialEq)]
      pub struct #envelope {
        pub status_code: u16,
        #(#envelope_fields,)*
      }

      impl #envelope {
        #(#constructors)*
      }
    });
  }
}

struct TraitFragment<'u>(&'u OperationDescriptor);

impl ToTokens for TraitFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let contract = &self.0.contract;
    let name = format_ident!("{}", contract.trait_name);
    let method = format_ident!("{}", contract.method);
    let request = format_ident!("{}", contract.request);
    let response = format_ident!("{}", contract.response);
    let doc = format!(" Implemented by the service for `{}`.", self.0.label());
    tokens.extend(quote! {
      #[doc = #doc]
      pub trait #name: Send + Sync {
        fn #method(
          &self,
          context: support::RequestContext,
          request: #request,
        ) -> support::BoxFuture<'_, support::anyhow::Result<#response>>;
      }
    });
  }
}

struct RequestParserFragment<'u>(&'u OperationDescriptor);

impl ToTokens for RequestParserFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let op = self.0;
    let function = snake(op, "request");
    let function = format_ident!("parse_{function}");
    let request = format_ident!("{}", op.contract.request);

    let parts = if op.parameters.is_empty() {
      format_ident!("_parts")
    } else {
      format_ident!("parts")
    };
    let body = if op.body.is_some() {
      format_ident!("body")
    } else {
      format_ident!("_body")
    };

    let mut statements = vec![];
    let mut fields = vec![];
    for group in &op.parameters {
      let field = format_ident!("{}", group.location.request_field());
      let parser = format_ident!("parse_{}", snake(op, group.location.request_field()));
      let call = if group.location == ParamLocation::Path {
        quote! { #parser(parts).await? }
      } else {
        quote! { #parser(parts)? }
      };
      statements.push(quote! { let #field = #call; });
      fields.push(field);
    }
    if op.body.is_some() {
      let parser = format_ident!("parse_{}", snake(op, "body"));
      statements.push(quote! { let body = #parser(body).await?; });
      fields.push(format_ident!("body"));
    }

    tokens.extend(quote! {
      async fn #function(#parts: &mut Parts, #body: Body) -> Result<#request, support::RequestError> {
        #(#statements)*
        Ok(#request { #(#fields),* })
      }
    });
  }
}

struct GroupParserFragment<'u> {
  op: &'u OperationDescriptor,
  group: &'u ParameterGroup,
}

impl ToTokens for GroupParserFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let function = format_ident!("parse_{}", snake(self.op, self.group.location.request_field()));
    let model = format_ident!("{}", self.group.model);
    let fields = self.group.params.iter().map(|param| {
      let ident = format_ident!("{}", param.ident);
      let value = param_value(param);
      quote! { #ident: #value }
    });

    let (signature, source) = match self.group.location {
      ParamLocation::Path => (
        quote! { async fn #function(parts: &mut Parts) },
        quote! { support::ParamSource::path(parts).await? },
      ),
      ParamLocation::Query => (
        quote! { fn #function(parts: &Parts) },
        quote! { support::ParamSource::query(&parts.uri)? },
      ),
      ParamLocation::Header => (
        quote! { fn #function(parts: &Parts) },
        quote! { support::ParamSource::headers(&parts.headers) },
      ),
      ParamLocation::Cookie => (
        quote! { fn #function(parts: &Parts) },
        quote! { support::ParamSource::cookies(&parts.headers) },
      ),
    };

    tokens.extend(quote! {
      #signature -> Result<models::#model, support::RequestError> {
        let source = #source;
        let params = models::#model {
          #(#fields),*
        };
        support::Validate::validate(&params)?;
        Ok(params)
      }
    });
  }
}

/// Expression converting one raw parameter into its field value.
fn param_value(param: &ParameterDescriptor) -> TokenStream {
  let name = &param.name;
  let convert = |raw: TokenStream| match param.primitive {
    Primitive::String => quote! { #raw.to_owned() },
    Primitive::Timestamp => quote! { support::parse_timestamp(#name, #raw)? },
    Primitive::I32 => quote! { source.parse::<i32>(#name, #raw)? },
    Primitive::I64 => quote! { source.parse::<i64>(#name, #raw)? },
    Primitive::F64 => quote! { source.parse::<f64>(#name, #raw)? },
    Primitive::Bool => quote! { source.parse::<bool>(#name, #raw)? },
  };

  if param.required {
    let value = convert(quote! { source.require(#name)? });
    return if param.optional_repr {
      quote! { Some(#value) }
    } else {
      value
    };
  }

  match param.primitive {
    Primitive::String => quote! { source.get(#name).map(str::to_owned) },
    Primitive::Timestamp => quote! {
      source.get(#name).map(|raw| support::parse_timestamp(#name, raw)).transpose()?
    },
    primitive => {
      let ty = TypeRef::Primitive(primitive).render(Scope::Handlers);
      quote! { source.get(#name).map(|raw| source.parse::<#ty>(#name, raw)).transpose()? }
    }
  }
}

struct BodyParserFragment<'u> {
  op: &'u OperationDescriptor,
  body: &'u RequestBodyDescriptor,
  unit: &'u str,
  index: &'u ModelIndex<'u>,
}

impl ToTokens for BodyParserFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let function = format_ident!("parse_{}", snake(self.op, "body"));
    let ty = self.body.ty.render(Scope::Handlers);
    let validate = self
      .index
      .validator_for(self.unit, &self.body.ty)
      .map(|validator| {
        let path = validator.path(self.unit, Scope::Handlers);
        quote! { #path(&raw)?; }
      });
    let decode = quote! {
      #validate
      let body: #ty = support::decode(raw)?;
      support::check_value(&body)?;
    };

    let function_tokens = if self.body.required {
      quote! {
        async fn #function(body: Body) -> Result<#ty, support::RequestError> {
          let raw = support::read_json(body).await?;
          #decode
          Ok(body)
        }
      }
    } else {
      quote! {
        async fn #function(body: Body) -> Result<Option<#ty>, support::RequestError> {
          let Some(raw) = support::read_optional_json(body).await? else {
            return Ok(None);
          };
          #decode
          Ok(Some(body))
        }
      }
    };
    tokens.extend(function_tokens);
  }
}

struct WriterFragment<'u>(&'u OperationDescriptor);

impl ToTokens for WriterFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let op = self.0;
    let envelope = format_ident!("{}", op.contract.response);
    let writer = format_ident!("write_{}", snake(op, "response"));

    let mut slot_writers = vec![];
    let mut arms = vec![];
    for response in &op.responses {
      let slot = format_ident!("{}", op.response_slot(response.status));
      let slot_writer = format_ident!("write_{}", snake(op, &format!("response_{}", response.status)));
      let slot_field = format_ident!("response_{}", response.status);
      let status = status_literal(response.status);

      let headers = if response.headers.is_some() {
        quote! { support::header_pairs(&response.headers)? }
      } else {
        quote! { Vec::new() }
      };
      let write = if response.body.is_some() {
        quote! { support::json_response(#status, #headers, &response.body) }
      } else {
        quote! { support::empty_response(#status, #headers) }
      };
      let param = if response.body.is_some() || response.headers.is_some() {
        format_ident!("response")
      } else {
        format_ident!("_response")
      };
      slot_writers.push(quote! {
        fn #slot_writer(#param: #slot) -> Result<Response, support::ResponseError> {
          #write
        }
      });
      arms.push(quote! {
        #status => response
          .#slot_field
          .ok_or(support::ResponseError::UnknownResponseVariant(#status))
          .and_then(#slot_writer),
      });
    }

    let dispatch = if arms.is_empty() {
      quote! { Err(support::ResponseError::UnknownResponseVariant(response.status_code)) }
    } else {
      quote! {
        match response.status_code {
          #(#arms)*
          code => Err(support::ResponseError::UnknownResponseVariant(code)),
        }
      }
    };

    tokens.extend(quote! {
      #(#slot_writers)*

      fn #writer(response: #envelope) -> Result<Response, support::ResponseError> {
        #dispatch
      }
    });
  }
}

/// `Handler`: one injected implementation per operation plus the route table.
struct HandlerFragment<'u> {
  operations: &'u [OperationDescriptor],
}

impl ToTokens for HandlerFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let mut sorted: Vec<&OperationDescriptor> = self.operations.iter().collect();
    sorted.sort_by(|a, b| a.binding.cmp(&b.binding));

    let fields: Vec<_> = sorted
      .iter()
      .map(|op| {
        let field = format_ident!("{}", op.binding);
        let contract = format_ident!("{}", op.contract.trait_name);
        (field, contract)
      })
      .collect();
    let field_decls = fields.iter().map(|(field, contract)| quote! { #field: Arc<dyn #contract> });
    let params = field_decls.clone();
    let inits = fields.iter().map(|(field, _)| field);

    let router = RouterFragment {
      operations: self.operations,
    };
    let shims = self.operations.iter().map(ShimFragment);

    tokens.extend(quote! {
      /// Routes requests to the injected operation implementations.
      #[derive(Clone)]
      pub struct Handler {
        #(#field_decls),*
      }

      impl Handler {
        #[allow(clippy::too_many_arguments)]
        pub fn new(#(#params),*) -> Self {
          Self { #(#inits),* }
        }

        #router

        #(#shims)*
      }
    });
  }
}

/// Operations grouped by route path, in declaration order within each path.
fn routes_by_path(operations: &[OperationDescriptor]) -> BTreeMap<&str, Vec<&OperationDescriptor>> {
  operations.iter().fold(BTreeMap::new(), |mut acc, op| {
    acc.entry(op.route.path.as_str()).or_default().push(op);
    acc
  })
}

struct RouterFragment<'u> {
  operations: &'u [OperationDescriptor],
}

impl ToTokens for RouterFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let route_definitions = routes_by_path(self.operations).into_iter().map(|(path, ops)| {
      let method_handlers = ops.iter().map(|op| {
        let http_method = HttpMethodFragment(&op.route.method);
        let shim = format_ident!("handle_{}", op.binding.trim_start_matches("r#"));
        quote! {
          #http_method({
            let handler = Arc::clone(&handler);
            move |request: Request| async move { handler.#shim(request).await }
          })
        }
      });
      let chained = method_handlers.reduce(|acc, handler| quote! { #acc.#handler });
      quote! { .route(#path, #chained) }
    });

    tokens.extend(quote! {
      /// Registers every operation on `router`, one route per path.
      pub fn add_routes<S>(self, router: Router<S>) -> Router<S>
      where
        S: Clone + Send + Sync + 'static,
      {
        let handler = Arc::new(self);
        router
          #(#route_definitions)*
      }
    });
  }
}

/// Content-type shim plus the JSON handling path of one operation.
struct ShimFragment<'u>(&'u OperationDescriptor);

impl ToTokens for ShimFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let op = self.0;
    let binding = op.binding.trim_start_matches("r#");
    let shim = format_ident!("handle_{binding}");
    let json = format_ident!("handle_{binding}_json");
    let parser = format_ident!("parse_{}", snake(op, "request"));
    let writer = format_ident!("write_{}", snake(op, "response"));
    let field = format_ident!("{}", op.binding);
    let method = format_ident!("{}", op.contract.method);

    tokens.extend(quote! {
      async fn #shim(&self, request: Request) -> Response {
        if let Err(error) = support::negotiate_json(request.headers()) {
          return support::client_fault(&error);
        }
        self.#json(request).await
      }

      async fn #json(&self, request: Request) -> Response {
        let (mut parts, body) = request.with_limited_body().into_parts();
        let parsed = match #parser(&mut parts, body).await {
          Ok(parsed) => parsed,
          Err(error) => return support::client_fault(&error),
        };
        let context = support::RequestContext::from_parts(parts);
        match self.#field.#method(context, parsed).await {
          Ok(response) => #writer(response).unwrap_or_else(|_| support::server_fault()),
          Err(_) => support::server_fault(),
        }
      }
    });
  }
}

struct HttpMethodFragment<'m>(&'m Method);

impl ToTokens for HttpMethodFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match *self.0 {
      Method::POST => quote! { post },
      Method::PUT => quote! { put },
      Method::DELETE => quote! { delete },
      Method::PATCH => quote! { patch },
      Method::HEAD => quote! { head },
      Method::OPTIONS => quote! { options },
      Method::TRACE => quote! { trace },
      _ => quote! { get },
    };
    tokens.extend(ts);
  }
}

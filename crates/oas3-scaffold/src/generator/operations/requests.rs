use http::Method;
use openapiv3::Operation;

use super::OperationCompiler;
use crate::{
  generator::{
    ast::{OperationDescriptor, RequestBodyDescriptor},
    errors::{GeneratorError, GeneratorResult},
    resolve::{self, resolve_item},
  },
  utils::refs::ComponentKind,
};

impl<'a> OperationCompiler<'_, 'a> {
  pub(super) fn request_body(
    &mut self,
    descriptor: &OperationDescriptor,
    operation: &'a Operation,
  ) -> GeneratorResult<Option<RequestBodyDescriptor>> {
    let Some(value) = &operation.request_body else {
      return Ok(None);
    };
    let label = descriptor.label();
    if descriptor.method == Method::GET || descriptor.method == Method::DELETE {
      return Err(GeneratorError::MethodBodyNotAllowed {
        operation: label,
        method: descriptor.method.to_string(),
      });
    }

    let (owner, body) = resolve_item(
      self.session.documents,
      self.session.document,
      value,
      ComponentKind::RequestBodies,
      resolve::request_bodies,
    )?;
    let Some(source) = Self::json_schema(&label, "request body", &body.content)? else {
      return Ok(None);
    };
    let ty = self.body_type(&format!("{}RequestBody", descriptor.base), &label, owner, source)?;
    Ok(Some(RequestBodyDescriptor {
      ty,
      required: body.required,
    }))
  }
}

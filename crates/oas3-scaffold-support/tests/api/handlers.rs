//! AUTO-GENERATED CODE - DO NOT EDIT!
//!
//! Pet Store 1.0.0
//! Source: api.yaml
//! Generated by `oas3-scaffold`
//!
//! Pets served by the support crate integration tests.

use std::sync::Arc;
use axum::{
    RequestExt, Router, body::Body, extract::Request, http::request::Parts,
    response::Response, routing::{get, post},
};
use oas3_scaffold_support as support;
use super::models;
/// Parsed request of `POST /pets`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePetRequest {
    pub body: models::Pet,
}
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePetResponse201 {
    pub body: models::Pet,
    pub headers: models::CreatePetResponse201Headers,
}
/// Response of `POST /pets`: set exactly one slot, matching `status_code`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatePetResponse {
    pub status_code: u16,
    pub response_201: Option<CreatePetResponse201>,
}
impl CreatePetResponse {
    pub fn status_201(
        body: models::Pet,
        headers: models::CreatePetResponse201Headers,
    ) -> Self {
        Self {
            status_code: 201,
            response_201: Some(CreatePetResponse201 { body, headers }),
        }
    }
}
/// Implemented by the service for `POST /pets`.
pub trait CreatePetHandler: Send + Sync {
    fn handle_create_pet(
        &self,
        context: support::RequestContext,
        request: CreatePetRequest,
    ) -> support::BoxFuture<'_, support::anyhow::Result<CreatePetResponse>>;
}
async fn parse_create_pet_request(
    _parts: &mut Parts,
    body: Body,
) -> Result<CreatePetRequest, support::RequestError> {
    let body = parse_create_pet_body(body).await?;
    Ok(CreatePetRequest { body })
}
async fn parse_create_pet_body(
    body: Body,
) -> Result<models::Pet, support::RequestError> {
    let raw = support::read_json(body).await?;
    models::validate_pet_json(&raw)?;
    let body: models::Pet = support::decode(raw)?;
    support::check_value(&body)?;
    Ok(body)
}
fn write_create_pet_response_201(
    response: CreatePetResponse201,
) -> Result<Response, support::ResponseError> {
    support::json_response(
        201,
        support::header_pairs(&response.headers)?,
        &response.body,
    )
}
fn write_create_pet_response(
    response: CreatePetResponse,
) -> Result<Response, support::ResponseError> {
    match response.status_code {
        201 => {
            response
                .response_201
                .ok_or(support::ResponseError::UnknownResponseVariant(201))
                .and_then(write_create_pet_response_201)
        }
        code => Err(support::ResponseError::UnknownResponseVariant(code)),
    }
}
/// Parsed request of `GET /pets/{petId}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowPetRequest {
    pub path: models::ShowPetPathParams,
    pub cookies: models::ShowPetCookies,
}
#[derive(Debug, Clone, PartialEq)]
pub struct ShowPetResponse200 {
    pub body: models::Pet,
}
#[derive(Debug, Clone, PartialEq)]
pub struct ShowPetResponse404 {}
/// Response of `GET /pets/{petId}`: set exactly one slot, matching `status_code`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowPetResponse {
    pub status_code: u16,
    pub response_200: Option<ShowPetResponse200>,
    pub response_404: Option<ShowPetResponse404>,
}
impl ShowPetResponse {
    pub fn status_200(body: models::Pet) -> Self {
        Self {
            status_code: 200,
            response_200: Some(ShowPetResponse200 { body }),
            ..Self::default()
        }
    }
    pub fn status_404() -> Self {
        Self {
            status_code: 404,
            response_404: Some(ShowPetResponse404 {}),
            ..Self::default()
        }
    }
}
/// Implemented by the service for `GET /pets/{petId}`.
pub trait ShowPetHandler: Send + Sync {
    fn handle_show_pet(
        &self,
        context: support::RequestContext,
        request: ShowPetRequest,
    ) -> support::BoxFuture<'_, support::anyhow::Result<ShowPetResponse>>;
}
async fn parse_show_pet_request(
    parts: &mut Parts,
    _body: Body,
) -> Result<ShowPetRequest, support::RequestError> {
    let path = parse_show_pet_path(parts).await?;
    let cookies = parse_show_pet_cookies(parts)?;
    Ok(ShowPetRequest { path, cookies })
}
async fn parse_show_pet_path(
    parts: &mut Parts,
) -> Result<models::ShowPetPathParams, support::RequestError> {
    let source = support::ParamSource::path(parts).await?;
    let params = models::ShowPetPathParams {
        pet_id: source.parse::<i64>("petId", source.require("petId")?)?,
    };
    support::Validate::validate(&params)?;
    Ok(params)
}
fn parse_show_pet_cookies(
    parts: &Parts,
) -> Result<models::ShowPetCookies, support::RequestError> {
    let source = support::ParamSource::cookies(&parts.headers);
    let params = models::ShowPetCookies {
        session: source.require("session")?.to_owned(),
    };
    support::Validate::validate(&params)?;
    Ok(params)
}
fn write_show_pet_response_200(
    response: ShowPetResponse200,
) -> Result<Response, support::ResponseError> {
    support::json_response(200, Vec::new(), &response.body)
}
fn write_show_pet_response_404(
    _response: ShowPetResponse404,
) -> Result<Response, support::ResponseError> {
    support::empty_response(404, Vec::new())
}
fn write_show_pet_response(
    response: ShowPetResponse,
) -> Result<Response, support::ResponseError> {
    match response.status_code {
        200 => {
            response
                .response_200
                .ok_or(support::ResponseError::UnknownResponseVariant(200))
                .and_then(write_show_pet_response_200)
        }
        404 => {
            response
                .response_404
                .ok_or(support::ResponseError::UnknownResponseVariant(404))
                .and_then(write_show_pet_response_404)
        }
        code => Err(support::ResponseError::UnknownResponseVariant(code)),
    }
}
/// Routes requests to the injected operation implementations.
#[derive(Clone)]
pub struct Handler {
    create_pet: Arc<dyn CreatePetHandler>,
    show_pet: Arc<dyn ShowPetHandler>,
}
impl Handler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_pet: Arc<dyn CreatePetHandler>,
        show_pet: Arc<dyn ShowPetHandler>,
    ) -> Self {
        Self { create_pet, show_pet }
    }
    /// Registers every operation on `router`, one route per path.
    pub fn add_routes<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handler = Arc::new(self);
        router
            .route(
                "/pets",
                post({
                    let handler = Arc::clone(&handler);
                    move |request: Request| async move {
                        handler.handle_create_pet(request).await
                    }
                }),
            )
            .route(
                "/pets/{petId}",
                get({
                    let handler = Arc::clone(&handler);
                    move |request: Request| async move {
                        handler.handle_show_pet(request).await
                    }
                }),
            )
    }
    async fn handle_create_pet(&self, request: Request) -> Response {
        if let Err(error) = support::negotiate_json(request.headers()) {
            return support::client_fault(&error);
        }
        self.handle_create_pet_json(request).await
    }
    async fn handle_create_pet_json(&self, request: Request) -> Response {
        let (mut parts, body) = request.with_limited_body().into_parts();
        let parsed = match parse_create_pet_request(&mut parts, body).await {
            Ok(parsed) => parsed,
            Err(error) => return support::client_fault(&error),
        };
        let context = support::RequestContext::from_parts(parts);
        match self.create_pet.handle_create_pet(context, parsed).await {
            Ok(response) => {
                write_create_pet_response(response)
                    .unwrap_or_else(|_| support::server_fault())
            }
            Err(_) => support::server_fault(),
        }
    }
    async fn handle_show_pet(&self, request: Request) -> Response {
        if let Err(error) = support::negotiate_json(request.headers()) {
            return support::client_fault(&error);
        }
        self.handle_show_pet_json(request).await
    }
    async fn handle_show_pet_json(&self, request: Request) -> Response {
        let (mut parts, body) = request.with_limited_body().into_parts();
        let parsed = match parse_show_pet_request(&mut parts, body).await {
            Ok(parsed) => parsed,
            Err(error) => return support::client_fault(&error),
        };
        let context = support::RequestContext::from_parts(parts);
        match self.show_pet.handle_show_pet(context, parsed).await {
            Ok(response) => {
                write_show_pet_response(response)
                    .unwrap_or_else(|_| support::server_fault())
            }
            Err(_) => support::server_fault(),
        }
    }
}

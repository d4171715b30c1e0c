//! AUTO-GENERATED CODE - DO NOT EDIT!
//!
//! Pet Store 1.0.0
//! Source: api.yaml
//! Generated by `oas3-scaffold`
//!
//! Pets served by the support crate integration tests.

use oas3_scaffold_support as support;
use serde::{Deserialize, Serialize};
use oas3_scaffold_support::Timestamp;
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePetResponse201Headers {
    /// Validation: `required`
    #[serde(rename = "Location")]
    pub location: String,
}
impl support::Validate for CreatePetResponse201Headers {
    fn validate(&self) -> Result<(), support::ValidationErrors> {
        let mut report = support::Report::new();
        report.field("Location", &self.location, &[support::Rule::Required]);
        report.finish()
    }
}
impl support::Inspect for CreatePetResponse201Headers {
    fn inspect(&self) -> support::Subject<'_> {
        support::Subject::Model(self)
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Validation: `required,min=1`
    pub name: String,
    /// Validation: `omitempty,max=10`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}
impl support::Validate for Pet {
    fn validate(&self) -> Result<(), support::ValidationErrors> {
        let mut report = support::Report::new();
        report
            .field("name", &self.name, &[support::Rule::Required, support::Rule::LengthMin(1)]);
        report
            .field(
                "tag",
                &self.tag,
                &[support::Rule::OmitIfAbsent, support::Rule::LengthMax(10)],
            );
        report.finish()
    }
}
impl support::Inspect for Pet {
    fn inspect(&self) -> support::Subject<'_> {
        support::Subject::Model(self)
    }
}
pub type Pets = Vec<Pet>;
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowPetCookies {
    /// Validation: `required`
    pub session: String,
}
impl support::Validate for ShowPetCookies {
    fn validate(&self) -> Result<(), support::ValidationErrors> {
        let mut report = support::Report::new();
        report.field("session", &self.session, &[support::Rule::Required]);
        report.finish()
    }
}
impl support::Inspect for ShowPetCookies {
    fn inspect(&self) -> support::Subject<'_> {
        support::Subject::Model(self)
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowPetPathParams {
    /// Validation: `required,min=1`
    #[serde(rename = "petId")]
    pub pet_id: i64,
}
impl support::Validate for ShowPetPathParams {
    fn validate(&self) -> Result<(), support::ValidationErrors> {
        let mut report = support::Report::new();
        report
            .field("petId", &self.pet_id, &[support::Rule::Required, support::Rule::Min(1.0)]);
        report.finish()
    }
}
impl support::Inspect for ShowPetPathParams {
    fn inspect(&self) -> support::Subject<'_> {
        support::Subject::Model(self)
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Validation: `required`
    pub at: Timestamp,
    pub note: Option<String>,
    /// Validation: `required`
    pub weight: f64,
}
impl support::Validate for Visit {
    fn validate(&self) -> Result<(), support::ValidationErrors> {
        let mut report = support::Report::new();
        report.field("at", &self.at, &[support::Rule::Required]);
        report.field("note", &self.note, &[]);
        report.field("weight", &self.weight, &[support::Rule::Required]);
        report.finish()
    }
}
impl support::Inspect for Visit {
    fn inspect(&self) -> support::Subject<'_> {
        support::Subject::Model(self)
    }
}
/// Checks a raw `CreatePetResponse201Headers` document before it is decoded.
pub fn validate_create_pet_response_201_headers_json(
    value: &support::serde_json::Value,
) -> Result<(), support::RequestError> {
    let object = support::deep::as_object(value)?;
    const REQUIRED: &[&str] = &["Location"];
    const NULLABLE: &[&str] = &[];
    support::deep::check_required(object, REQUIRED, NULLABLE)?;
    Ok(())
}
/// Checks a raw `Pet` document before it is decoded.
pub fn validate_pet_json(
    value: &support::serde_json::Value,
) -> Result<(), support::RequestError> {
    let object = support::deep::as_object(value)?;
    const REQUIRED: &[&str] = &["name"];
    const NULLABLE: &[&str] = &[];
    support::deep::check_required(object, REQUIRED, NULLABLE)?;
    Ok(())
}
/// Checks a raw `Pets` document before it is decoded.
pub fn validate_pets_json(
    value: &support::serde_json::Value,
) -> Result<(), support::RequestError> {
    support::deep::check_elements(value, validate_pet_json)
}
/// Checks a raw `ShowPetCookies` document before it is decoded.
pub fn validate_show_pet_cookies_json(
    value: &support::serde_json::Value,
) -> Result<(), support::RequestError> {
    let object = support::deep::as_object(value)?;
    const REQUIRED: &[&str] = &["session"];
    const NULLABLE: &[&str] = &[];
    support::deep::check_required(object, REQUIRED, NULLABLE)?;
    Ok(())
}
/// Checks a raw `ShowPetPathParams` document before it is decoded.
pub fn validate_show_pet_path_params_json(
    value: &support::serde_json::Value,
) -> Result<(), support::RequestError> {
    let object = support::deep::as_object(value)?;
    const REQUIRED: &[&str] = &["petId"];
    const NULLABLE: &[&str] = &[];
    support::deep::check_required(object, REQUIRED, NULLABLE)?;
    Ok(())
}
/// Checks a raw `Visit` document before it is decoded.
pub fn validate_visit_json(
    value: &support::serde_json::Value,
) -> Result<(), support::RequestError> {
    let object = support::deep::as_object(value)?;
    const REQUIRED: &[&str] = &["at", "note", "weight"];
    const NULLABLE: &[&str] = &["note"];
    support::deep::check_required(object, REQUIRED, NULLABLE)?;
    Ok(())
}

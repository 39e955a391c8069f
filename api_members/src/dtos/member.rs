use std::borrow::Cow;

use chrono::NaiveDate;
use common::{
    error::{AppError, Res},
    misc::{sanitize_email, sanitize_phone, sanitize_string},
};
use db::{
    dtos::member::{MemberCreateRequest, MemberUpdateRequest},
    models::member::{CUSTOMER_EXISTING, CUSTOMER_NEW},
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::input::empty_as_none;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    match name.chars().count() {
        0 => Err(invalid("required", "Name is required")),
        n if n > 100 => Err(invalid("length", "Name too long")),
        _ => Ok(()),
    }
}

fn check_phone(phone: &str) -> Result<(), ValidationError> {
    match phone.chars().count() {
        n if n < 10 => Err(invalid("length", "Phone number too short")),
        n if n > 15 => Err(invalid("length", "Phone number too long")),
        _ => Ok(()),
    }
}

/// Member create/update body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    #[serde(default)]
    #[validate(custom(function = "check_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "check_phone"))]
    pub phone: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 50, message = "Relationship status too long"))]
    pub relationship_status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 100, message = "Service looking too long"))]
    pub service_looking: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 50, message = "Platform too long"))]
    pub platform: Option<String>,
    /// Only honoured on update.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub customer_type: Option<String>,
}

/// `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date_of_birth(value: Option<&str>) -> Res<Option<NaiveDate>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let date_part = value.trim().get(..10).unwrap_or(value.trim());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::BadRequest("Invalid date of birth".to_string()))
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| sanitize_string(&v))
        .filter(|v| !v.is_empty())
}

impl MemberRequest {
    /// Input is cleaned first so the rules judge what will be stored.
    fn sanitized(self) -> Self {
        MemberRequest {
            name: sanitize_string(&self.name),
            phone: sanitize_phone(&self.phone),
            email: self
                .email
                .map(|e| sanitize_email(&e))
                .filter(|e| !e.is_empty()),
            relationship_status: clean(self.relationship_status),
            service_looking: clean(self.service_looking),
            platform: clean(self.platform),
            ..self
        }
    }

    pub fn into_create(self) -> Res<MemberCreateRequest> {
        let req = self.sanitized();
        req.validate()?;
        Ok(MemberCreateRequest {
            date_of_birth: parse_date_of_birth(req.date_of_birth.as_deref())?,
            name: req.name,
            phone: req.phone,
            email: req.email,
            relationship_status: req.relationship_status,
            service_looking: req.service_looking,
            platform: req.platform,
        })
    }

    pub fn into_update(self) -> Res<MemberUpdateRequest> {
        let customer_type = match self.customer_type.as_deref().map(str::trim) {
            None => None,
            Some(t) if t == CUSTOMER_NEW || t == CUSTOMER_EXISTING => Some(t.to_string()),
            Some(_) => {
                return Err(AppError::BadRequest(
                    "Customer type must be new or existing".to_string(),
                ));
            }
        };
        let create = self.into_create()?;
        Ok(MemberUpdateRequest {
            name: create.name,
            phone: create.phone,
            email: create.email,
            date_of_birth: create.date_of_birth,
            relationship_status: create.relationship_status,
            service_looking: create.service_looking,
            platform: create.platform,
            customer_type,
        })
    }
}

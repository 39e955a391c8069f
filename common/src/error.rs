use actix_web::HttpResponse;
use thiserror::Error;
use validator::ValidationErrors;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JWT(#[from] jsonwebtoken::errors::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    // === APPLICATION ERRORS ===
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Turns a missing row into `NotFound(what)`, keeping every other
    /// database failure as-is.
    pub fn from_lookup(error: sqlx::Error, what: &str) -> Self {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound(what.to_string()),
            other => AppError::Database(other),
        }
    }

    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                serde_json::json!({ "error": err_msg })
            } else {
                serde_json::json!({ "error": "Internal server error" })
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::JWT(error) => {
                log::error!("JWT error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::Storage(error) => {
                log::error!("Storage error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(error))
            }
            AppError::Mail(error) => {
                log::error!("Mail error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(error))
            }
            AppError::Pdf(error) => {
                log::error!("PDF generation error: {}", error);
                if is_dev {
                    HttpResponse::InternalServerError().json(serde_json::json!({
                        "error": "PDF generation failed",
                        "details": error,
                    }))
                } else {
                    HttpResponse::InternalServerError()
                        .json(serde_json::json!({ "error": "PDF generation failed" }))
                }
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(_) => {
                HttpResponse::Unauthorized().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::Forbidden(_) => {
                HttpResponse::Forbidden().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::NotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::BadRequest(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::Conflict(_) => {
                HttpResponse::Conflict().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::TooManyRequests(_) => HttpResponse::TooManyRequests()
                .json(serde_json::json!({ "error": self.to_string() })),

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(error))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    /// Reports the first failing rule, fields visited in name order so the
    /// message is stable.
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.keys().collect();
        fields.sort();

        let message = fields
            .first()
            .and_then(|field| field_errors.get(*field))
            .and_then(|errs| errs.first())
            .and_then(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation error".to_string());

        AppError::BadRequest(message)
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use actix_web::{ResponseError, http::StatusCode};
    use validator::ValidationError;

    use super::*;

    #[test]
    fn maps_application_errors_to_status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::TooManyRequests("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (AppError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Pdf("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{:?}", error);
        }
    }

    #[test]
    fn missing_row_becomes_not_found() {
        let error = AppError::from_lookup(sqlx::Error::RowNotFound, "Member not found");
        assert!(matches!(error, AppError::NotFound(ref m) if m == "Member not found"));
    }

    #[test]
    fn validation_errors_report_first_message() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "username",
            ValidationError::new("length").with_message(Cow::Borrowed("Username is required")),
        );
        let error = AppError::from(errors);
        assert_eq!(error.to_string(), "Username is required");
    }
}

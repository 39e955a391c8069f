use common::{
    error::{AppError, Res},
    misc::StaffRole,
};
use db::models::user::StaffUser;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(message)));
    }
    Ok(())
}

fn username_required(value: &str) -> Result<(), ValidationError> {
    required(value, "Username is required")
}

fn password_required(value: &str) -> Result<(), ValidationError> {
    required(value, "Password is required")
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        custom(function = "username_required"),
        length(max = 50, message = "Username too long")
    )]
    pub username: String,
    #[validate(
        custom(function = "password_required"),
        length(max = 100, message = "Password too long")
    )]
    pub password: String,
}

/// What a client learns about the signed-in staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: StaffRole,
}

impl From<&StaffUser> for SessionUser {
    fn from(user: &StaffUser) -> Self {
        SessionUser {
            id: user.id,
            username: user.username.clone(),
            role: user.staff_role(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub user: SessionUser,
}

/// Body of user create and update calls. Fields are optional here so a
/// missing one yields the combined "required" message.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug)]
pub struct ValidUser {
    pub username: String,
    pub password: String,
    pub role: StaffRole,
}

impl UserRequest {
    pub fn validate_user(self) -> Res<ValidUser> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        let (Some(username), Some(password), Some(role)) = (
            non_empty(self.username),
            non_empty(self.password),
            non_empty(self.role),
        ) else {
            return Err(AppError::BadRequest(
                "Username, password, and role are required".to_string(),
            ));
        };

        let role = StaffRole::parse(&role).ok_or_else(|| {
            AppError::BadRequest("Role must be admin, staff, ADMIN, or STAFF".to_string())
        })?;

        let username = username.trim().to_string();
        let len = username.chars().count();
        if !(3..=50).contains(&len) {
            return Err(AppError::BadRequest(
                "Username must be 3-50 characters".to_string(),
            ));
        }

        Ok(ValidUser {
            username,
            password,
            role,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<StaffUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: Option<&str>, password: Option<&str>, role: Option<&str>) -> UserRequest {
        UserRequest {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            role: role.map(str::to_string),
        }
    }

    fn message(result: Res<ValidUser>) -> String {
        result.err().map(|e| e.to_string()).unwrap_or_default()
    }

    #[test]
    fn login_messages() {
        let empty = LoginRequest {
            username: "".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(
            AppError::from(empty.validate().unwrap_err()).to_string(),
            "Username is required"
        );

        let long = LoginRequest {
            username: "a".repeat(51),
            password: "pw".to_string(),
        };
        assert_eq!(
            AppError::from(long.validate().unwrap_err()).to_string(),
            "Username too long"
        );
    }

    #[test]
    fn user_request_checks_in_order() {
        assert_eq!(
            message(request(Some("sam"), None, Some("staff")).validate_user()),
            "Username, password, and role are required"
        );
        assert_eq!(
            message(request(Some("sam"), Some("pw"), Some("owner")).validate_user()),
            "Role must be admin, staff, ADMIN, or STAFF"
        );
        assert_eq!(
            message(request(Some("ab"), Some("pw"), Some("staff")).validate_user()),
            "Username must be 3-50 characters"
        );
    }

    #[test]
    fn user_request_normalizes_role() {
        let valid = request(Some(" frontdesk "), Some("pw"), Some("ADMIN"))
            .validate_user()
            .unwrap();
        assert_eq!(valid.username, "frontdesk");
        assert_eq!(valid.role, StaffRole::Admin);
    }
}

use common::error::{AppError, Res};
use db::models::user::StaffUser;
use sqlx::PgPool;

use crate::{dtos::auth::LoginRequest, services::password};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Looks the user up and checks the password. Unknown users and wrong
/// passwords get the same message. The password is checked exactly as sent,
/// matching how it was hashed when the account was created.
pub async fn authenticate_user(pool: &PgPool, login: &LoginRequest) -> Res<StaffUser> {
    let user = db::user::find_user_by_username(pool, login.username.trim()).await?;
    check_credentials(user, &login.password)
}

pub(crate) fn check_credentials(user: Option<StaffUser>, password: &str) -> Res<StaffUser> {
    let user = user.ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".to_string()));
    }

    if password::verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::dtos::auth::UserRequest;

    fn user(password: &str, is_active: bool) -> StaffUser {
        let at = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        StaffUser {
            id: 2,
            username: "desk".to_string(),
            password_hash: password::hash_password(password).unwrap(),
            role: "staff".to_string(),
            is_active,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn accepts_matching_password() {
        let user = check_credentials(Some(user("pw", true)), "pw").unwrap();
        assert_eq!(user.id, 2);
    }

    #[test]
    fn unknown_user_and_wrong_password_look_the_same() {
        let unknown = check_credentials(None, "pw").unwrap_err().to_string();
        let wrong = check_credentials(Some(user("pw", true)), "nope")
            .unwrap_err()
            .to_string();
        assert_eq!(unknown, "Invalid credentials");
        assert_eq!(unknown, wrong);
    }

    #[test]
    fn deactivated_account_is_refused() {
        let result = check_credentials(Some(user("pw", false)), "pw");
        assert_eq!(result.unwrap_err().to_string(), "Account is deactivated");
    }

    #[test]
    fn padded_password_survives_create_then_login() {
        let created = UserRequest {
            username: Some("frontdesk".to_string()),
            password: Some(" pass word ".to_string()),
            role: Some("staff".to_string()),
        }
        .validate_user()
        .unwrap();
        let mut stored = user("unused", true);
        stored.password_hash = password::hash_password(&created.password).unwrap();

        let login: LoginRequest =
            serde_json::from_value(serde_json::json!({
                "username": " frontdesk ",
                "password": " pass word ",
            }))
            .unwrap();
        assert!(check_credentials(Some(stored.clone()), &login.password).is_ok());
        assert!(check_credentials(Some(stored), "pass word").is_err());
    }
}

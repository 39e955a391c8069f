use actix_session::Session;
use actix_web::{Responder, get};
use common::{
    error::{AppError, Res},
    http::Success,
};

use crate::dtos::auth::{SessionResponse, SessionUser};

pub(crate) const SESSION_ID_KEY: &str = "sessionId";
pub(crate) const SESSION_USER_KEY: &str = "user";

/// Retrieves the signed-in staff member from the session cookie.
///
/// # Output
/// - Success: `{ sessionId, user }`
/// - Error: 401 when there is no session
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/session', { credentials: 'include' });
/// if (response.status === 401) {
///   window.location.href = '/login';
/// }
/// ```
#[get("/session")]
pub async fn get_session(session: Session) -> Res<impl Responder> {
    let user = session
        .get::<SessionUser>(SESSION_USER_KEY)
        .map_err(|_| AppError::BadRequest("Session user error".to_string()))?
        .ok_or_else(|| AppError::Unauthorized("No user data found".to_string()))?;
    let session_id = session
        .get::<String>(SESSION_ID_KEY)
        .map_err(|_| AppError::BadRequest("Session token error".to_string()))?
        .ok_or_else(|| AppError::Unauthorized("No session token found".to_string()))?;

    Success::ok(SessionResponse { session_id, user })
}

use std::sync::Arc;

use actix_session::Session;
use actix_web::{HttpResponse, Responder, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    jwt::{self, ClaimsSpec},
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    dtos::auth::{LoginRequest, LoginResponse, SessionUser},
    routes::session::{SESSION_ID_KEY, SESSION_USER_KEY},
    services,
};

/// Signs a staff member in with username and password.
///
/// # Input
/// - `login_data`: `{ "username": "...", "password": "..." }`
///
/// # Output
/// - Success: `{ success: true, user: { id, username, role }, sessionId }`.
///   `sessionId` is the bearer token for protected routes; it is also kept
///   in the cookie session.
/// - Error: 400 on validation, 401 "Invalid credentials" or "Account is
///   deactivated", 429 from the login limiter.
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/db-login', {
///   method: 'POST',
///   credentials: 'include',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ username: 'frontdesk', password: 'secret' })
/// });
/// const { sessionId, user } = await response.json();
/// localStorage.setItem('sessionId', sessionId);
/// ```
pub async fn post_db_login(
    login_data: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
    session: Session,
) -> Res<impl Responder> {
    let login_data = login_data.into_inner();
    login_data.validate()?;

    let pg_pool: &PgPool = &pool;
    let user = services::auth::authenticate_user(pg_pool, &login_data).await?;
    let session_user = SessionUser::from(&user);

    let session_id = jwt::generate_jwt(
        ClaimsSpec {
            user_id: session_user.id,
            username: session_user.username.clone(),
            role: session_user.role,
        },
        &config.jwt_config,
    )?;

    session.renew();
    session
        .insert(SESSION_ID_KEY, &session_id)
        .map_err(|_| AppError::Internal("Failed to insert session cookie".to_string()))?;
    session
        .insert(SESSION_USER_KEY, &session_user)
        .map_err(|_| AppError::Internal("Failed to insert session cookie".to_string()))?;

    log::info!("{} signed in", session_user.username);
    Success::ok(LoginResponse {
        success: true,
        user: session_user,
        session_id,
    })
}

/// Clears the cookie session. Bearer tokens already handed out stay valid
/// until they expire.
#[post("/logout")]
pub async fn post_logout(session: Session) -> impl Responder {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

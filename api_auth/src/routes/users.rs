use std::sync::Arc;

use actix_web::{Responder, delete, get, post, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{
    dtos::auth::{UserRequest, UserResponse},
    services,
};

/// Lists every staff account. Password hashes are never serialized.
#[get("")]
pub async fn get_users(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let users = services::user::list_users(&pool).await?;
    Success::ok(users)
}

/// Creates a staff account.
///
/// # Input
/// - `req`: `{ username, password, role }`, role `admin` or `staff` in any case
///
/// # Output
/// - Success: `{ success: true, message: "User created successfully", user }`
/// - Error: 400 on validation, 409 "Username already exists"
#[post("")]
pub async fn post_user(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<UserRequest>,
) -> Res<impl Responder> {
    let data = req.into_inner().validate_user()?;
    let user = services::user::create_user(&pool, data).await?;
    log::info!("{} created user {}", claims.username, user.username);
    Success::ok(UserResponse {
        success: true,
        message: "User created successfully",
        user: Some(user),
    })
}

#[put("/{id}")]
pub async fn put_user(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<i32>,
    req: web::Json<UserRequest>,
) -> Res<impl Responder> {
    let data = req.into_inner().validate_user()?;
    let user = services::user::update_user(&pool, path.into_inner(), data).await?;
    log::info!("{} updated user {}", claims.username, user.username);
    Success::ok(UserResponse {
        success: true,
        message: "User updated successfully",
        user: Some(user),
    })
}

#[delete("/{id}")]
pub async fn delete_user(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<i32>,
) -> Res<impl Responder> {
    let id = path.into_inner();
    services::user::delete_user(&pool, id).await?;
    log::info!("{} deleted user {}", claims.username, id);
    Success::ok(UserResponse {
        success: true,
        message: "User deleted successfully",
        user: None,
    })
}

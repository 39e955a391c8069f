use std::sync::Arc;

use actix_web::{Responder, get, post, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{dtos::member::MemberRequest, services};

/// Members newest first, each with its latest BMI summary in `bmiRecords`.
#[get("")]
pub async fn get_members(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let members = services::member::list_members(&pool).await?;
    Success::ok(members)
}

/// Registers a member; the `memberId` is generated.
///
/// # Output
/// - Success: 201 with the created member
/// - Error: 400 with the first validation message
#[post("")]
pub async fn post_member(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<MemberRequest>,
) -> Res<impl Responder> {
    let data = req.into_inner().into_create()?;
    let member = services::member::create_member(&pool, data).await?;
    log::info!("{} registered member {}", claims.username, member.member_id);
    Success::created(member)
}

#[get("/{id}")]
pub async fn get_member(
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<i32>,
) -> Res<impl Responder> {
    let member = services::member::get_member(&pool, path.into_inner()).await?;
    Success::ok(member)
}

#[put("/{id}")]
pub async fn put_member(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<i32>,
    req: web::Json<MemberRequest>,
) -> Res<impl Responder> {
    let data = req.into_inner().into_update()?;
    let member = services::member::update_member(&pool, path.into_inner(), data).await?;
    log::info!("{} updated member {}", claims.username, member.member_id);
    Success::ok(member)
}

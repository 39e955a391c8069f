use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{error::Res, http::Success};
use notify::NotificationPipeline;
use sqlx::PgPool;

use crate::{dtos::bmi::BmiRequest, services};

/// Records an assessment for member `{id}`.
///
/// # Input
/// - `req`: `{ height, weight, unit?, attendedBy?, healthConclusion?, ...metrics, uploadedImageInfo? }`
///
/// # Output
/// - Success: 201 with the record, the updated `member` and `notifications`
/// - Error: 400 on validation, 404 "Member not found"
#[post("/{id}/bmi")]
pub async fn post_bmi(
    pool: web::Data<Arc<PgPool>>,
    pipeline: web::Data<Arc<NotificationPipeline>>,
    path: web::Path<i32>,
    req: web::Json<BmiRequest>,
) -> Res<impl Responder> {
    let data = req.into_inner().into_valid()?;
    let recorded =
        services::bmi::record_assessment(&pool, &pipeline, path.into_inner(), data).await?;
    Success::created(recorded)
}

#[get("/{id}/bmi")]
pub async fn get_bmi_records(
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<i32>,
) -> Res<impl Responder> {
    let records = services::bmi::list_records(&pool, path.into_inner()).await?;
    Success::ok(records)
}

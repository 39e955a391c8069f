use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{error::Res, http::Success};
use notify::NotificationPipeline;
use sqlx::PgPool;

use crate::{dtos::report::PdfRequest, services};

/// Renders the health report for a stored BMI record as a PDF download.
#[post("/generate-pdf")]
pub async fn post_generate_pdf(
    pool: web::Data<Arc<PgPool>>,
    pipeline: web::Data<Arc<NotificationPipeline>>,
    req: web::Json<PdfRequest>,
) -> Res<impl Responder> {
    let report =
        services::report::render_report(&pool, pipeline.reports(), req.into_inner()).await?;
    Success::pdf(report.bytes, report.file_name)
}

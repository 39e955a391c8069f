use common::{error::Res, misc::report_file_name};
use notify::ReportGenerator;
use sqlx::PgPool;

use crate::dtos::report::PdfRequest;

/// A rendered health report and its download name.
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

pub async fn render_report(
    pool: &PgPool,
    reports: &ReportGenerator,
    req: PdfRequest,
) -> Res<RenderedReport> {
    let data = db::bmi::get_bmi_record_with_member(pool, req.bmi_record_id).await?;
    let bytes = reports
        .generate(&data, req.uploaded_image_info.as_ref())
        .await?;

    log::info!(
        "Generated report for BMI record {} ({} bytes)",
        data.record.id,
        bytes.len()
    );
    Ok(RenderedReport {
        bytes,
        file_name: report_file_name(&data.member.name),
    })
}

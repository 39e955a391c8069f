use common::error::Res;
use db::{
    dtos::bmi::BmiRecordCreateRequest,
    models::{
        bmi::{BmiRecord, BmiRecordWithMember},
        member::Member,
    },
};
use notify::{NotificationOutcome, NotificationPipeline};
use serde::Serialize;
use sqlx::PgPool;

use crate::dtos::bmi::ValidBmi;

/// Saved record, the member as it is now, and what the notifications did.
#[derive(Debug, Serialize)]
pub struct RecordedAssessment {
    #[serde(flatten)]
    pub record: BmiRecord,
    pub member: Member,
    pub notifications: NotificationOutcome,
}

/// Stores the assessment, promotes the member to an existing customer and
/// sends the follow-up notifications.
///
/// Notifications are built from the member as loaded before the promotion so
/// a first visit still gets the welcome wording. Neither the promotion nor
/// the notifications can fail the request once the record is saved.
pub async fn record_assessment(
    pool: &PgPool,
    pipeline: &NotificationPipeline,
    member_id: i32,
    data: ValidBmi,
) -> Res<RecordedAssessment> {
    let snapshot = db::member::get_member_by_id(pool, member_id).await?;

    let record = db::bmi::insert_bmi_record(
        pool,
        BmiRecordCreateRequest {
            member_id,
            height: data.assessment.height_cm,
            weight: data.assessment.weight_kg,
            bmi: data.assessment.bmi,
            category: data.assessment.category.to_string(),
            metrics: data.metrics,
            health_conclusion: data.health_conclusion,
            attended_by: data.attended_by,
        },
    )
    .await?;

    log::info!(
        "BMI record {} saved for {} ({}, {})",
        record.id,
        snapshot.member_id,
        record.bmi,
        record.category
    );

    let member = match db::member::mark_existing_customer(pool, member_id).await {
        Ok(member) => member,
        Err(e) => {
            log::error!("Could not update customer type for member {}: {}", member_id, e);
            snapshot.clone()
        }
    };

    let joined = BmiRecordWithMember {
        record,
        member: snapshot,
    };
    let notifications = pipeline
        .run(&joined, data.uploaded_image_info.as_ref())
        .await;
    log::info!(
        "Notifications for BMI record {}: whatsapp {:?}, email {:?}",
        joined.record.id,
        notifications.whatsapp,
        notifications.email
    );

    Ok(RecordedAssessment {
        record: joined.record,
        member,
        notifications,
    })
}

pub async fn list_records(pool: &PgPool, member_id: i32) -> Res<Vec<BmiRecord>> {
    db::bmi::list_bmi_records(pool, member_id).await
}

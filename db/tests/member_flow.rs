//! Runs against a live Postgres; set `DATABASE_URL` and pass `--ignored`.

use bmi::{Measurement, assess};
use db::{
    bmi::{insert_bmi_record, list_bmi_records},
    dtos::{
        bmi::{BmiRecordCreateRequest, BodyMetrics},
        member::MemberCreateRequest,
    },
    member::{create_member, get_member_by_id, list_members_with_latest, mark_existing_customer},
    notification::{insert_notification, list_notifications_for_record, set_email_status},
};
use sqlx::PgPool;

fn jane() -> MemberCreateRequest {
    MemberCreateRequest {
        name: "Jane Doe".to_string(),
        phone: "9998887777".to_string(),
        email: None,
        date_of_birth: None,
        relationship_status: None,
        service_looking: None,
        platform: None,
    }
}

#[sqlx::test]
#[ignore]
async fn member_becomes_existing_after_first_record(pool: PgPool) {
    let member = create_member(&pool, jane()).await.unwrap();
    assert_eq!(member.member_id, format!("M{:03}", member.id));
    assert!(member.is_new_customer());

    let assessment = assess(Measurement::metric(160.0, 55.0));
    let record = insert_bmi_record(
        &pool,
        BmiRecordCreateRequest {
            member_id: member.id,
            height: assessment.height_cm,
            weight: assessment.weight_kg,
            bmi: assessment.bmi,
            category: assessment.category.to_string(),
            metrics: BodyMetrics::default(),
            health_conclusion: None,
            attended_by: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(record.bmi, 21.5);
    assert_eq!(record.category, "Normal Weight");

    mark_existing_customer(&pool, member.id).await.unwrap();
    let reloaded = get_member_by_id(&pool, member.id).await.unwrap();
    assert_eq!(reloaded.customer_type, "existing");

    let listed = list_members_with_latest(&pool).await.unwrap();
    let entry = listed.iter().find(|m| m.member.id == member.id).unwrap();
    assert_eq!(entry.bmi_records.len(), 1);
    assert_eq!(entry.bmi_records[0].id, record.id);

    assert_eq!(list_bmi_records(&pool, member.id).await.unwrap().len(), 1);
}

#[sqlx::test]
#[ignore]
async fn notification_row_tracks_channel_status(pool: PgPool) {
    let member = create_member(&pool, jane()).await.unwrap();
    let record = insert_bmi_record(
        &pool,
        BmiRecordCreateRequest {
            member_id: member.id,
            height: 170.0,
            weight: 70.0,
            bmi: 24.2,
            category: "Normal Weight".to_string(),
            metrics: BodyMetrics::default(),
            health_conclusion: None,
            attended_by: Some("Sam".to_string()),
        },
    )
    .await
    .unwrap();

    let notification = insert_notification(&pool, member.id, record.id).await.unwrap();
    assert!(!notification.email_sent);
    assert_eq!(notification.email_status, None);

    set_email_status(&pool, notification.id, false, "failed").await.unwrap();

    let rows = list_notifications_for_record(&pool, record.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email_status.as_deref(), Some("failed"));
}

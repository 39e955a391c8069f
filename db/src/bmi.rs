use common::error::{AppError, Res};
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    dtos::bmi::BmiRecordCreateRequest,
    member::get_member_by_id,
    models::bmi::{BmiRecord, BmiRecordWithMember},
};

pub async fn insert_bmi_record<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: BmiRecordCreateRequest,
) -> Res<BmiRecord> {
    let m = data.metrics;
    sqlx::query_as::<_, BmiRecord>(
        r#"
        INSERT INTO bmi_records (
            member_id, height, weight, bmi, category, age, ideal_body_weight, total_fat_percentage,
            subcutaneous_fat, visceral_fat, muscle_mass, resting_metabolism, biological_age,
            health_conclusion, attended_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(data.member_id)
    .bind(data.height)
    .bind(data.weight)
    .bind(data.bmi)
    .bind(data.category)
    .bind(m.age)
    .bind(m.ideal_body_weight)
    .bind(m.total_fat_percentage)
    .bind(m.subcutaneous_fat)
    .bind(m.visceral_fat)
    .bind(m.muscle_mass)
    .bind(m.resting_metabolism)
    .bind(m.biological_age)
    .bind(data.health_conclusion)
    .bind(data.attended_by)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Most recent first.
pub async fn list_bmi_records<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    member_id: i32,
) -> Res<Vec<BmiRecord>> {
    sqlx::query_as::<_, BmiRecord>(
        "SELECT * FROM bmi_records WHERE member_id = $1 ORDER BY recorded_at DESC, id DESC",
    )
    .bind(member_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_bmi_record<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
) -> Res<BmiRecord> {
    sqlx::query_as::<_, BmiRecord>("SELECT * FROM bmi_records WHERE id = $1")
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::from_lookup(e, "BMI record not found"))
}

pub async fn get_bmi_record_with_member(pool: &PgPool, id: i32) -> Res<BmiRecordWithMember> {
    let record = get_bmi_record(pool, id).await?;
    let member = get_member_by_id(pool, record.member_id).await?;
    Ok(BmiRecordWithMember { record, member })
}

use std::collections::HashMap;

use common::error::{AppError, Res};
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    bmi::list_bmi_records,
    dtos::member::{MemberCreateRequest, MemberUpdateRequest},
    models::{
        bmi::BmiSummary,
        member::{CUSTOMER_EXISTING, CUSTOMER_NEW, Member, MemberDetail, MemberWithLatest, format_member_id},
    },
};

#[derive(sqlx::FromRow)]
struct LatestSummaryRow {
    member_id: i32,
    #[sqlx(flatten)]
    summary: BmiSummary,
}

pub async fn list_members<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<Member>> {
    sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY created_at DESC, id DESC")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Members newest first, each carrying only its latest BMI summary.
pub async fn list_members_with_latest(pool: &PgPool) -> Res<Vec<MemberWithLatest>> {
    let members = list_members(pool).await?;

    let latest = sqlx::query_as::<_, LatestSummaryRow>(
        r#"
        SELECT DISTINCT ON (member_id) member_id, id, bmi, category, recorded_at
        FROM bmi_records
        ORDER BY member_id, recorded_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_member: HashMap<i32, BmiSummary> = latest
        .into_iter()
        .map(|row| (row.member_id, row.summary))
        .collect();

    Ok(members
        .into_iter()
        .map(|member| {
            let bmi_records = by_member.remove(&member.id).into_iter().collect();
            MemberWithLatest {
                member,
                bmi_records,
            }
        })
        .collect())
}

pub async fn get_member_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
) -> Res<Member> {
    sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::from_lookup(e, "Member not found"))
}

pub async fn get_member_detail(pool: &PgPool, id: i32) -> Res<MemberDetail> {
    let member = get_member_by_id(pool, id).await?;
    let bmi_records = list_bmi_records(pool, id).await?;
    Ok(MemberDetail {
        member,
        bmi_records,
    })
}

/// Derives the public `M###` id from the highest row id and inserts in one
/// transaction. The table lock serializes concurrent creates so ids never
/// collide.
pub async fn create_member(pool: &PgPool, data: MemberCreateRequest) -> Res<Member> {
    let mut tx = pool.begin().await?;

    sqlx::query("LOCK TABLE members IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let next_id: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM members")
        .fetch_one(&mut *tx)
        .await?;

    let member = sqlx::query_as::<_, Member>(
        r#"
        INSERT INTO members (member_id, name, phone, email, date_of_birth, relationship_status, service_looking, platform, customer_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(format_member_id(next_id))
    .bind(data.name)
    .bind(data.phone)
    .bind(data.email)
    .bind(data.date_of_birth)
    .bind(data.relationship_status)
    .bind(data.service_looking)
    .bind(data.platform)
    .bind(CUSTOMER_NEW)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(member)
}

pub async fn update_member<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
    data: MemberUpdateRequest,
) -> Res<Member> {
    sqlx::query_as::<_, Member>(
        r#"
        UPDATE members
        SET name = $2, phone = $3, email = $4, date_of_birth = $5, relationship_status = $6,
            service_looking = $7, platform = $8, customer_type = COALESCE($9, customer_type),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(data.name)
    .bind(data.phone)
    .bind(data.email)
    .bind(data.date_of_birth)
    .bind(data.relationship_status)
    .bind(data.service_looking)
    .bind(data.platform)
    .bind(data.customer_type)
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::from_lookup(e, "Member not found"))
}

pub async fn mark_existing_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
) -> Res<Member> {
    sqlx::query_as::<_, Member>(
        "UPDATE members SET customer_type = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(CUSTOMER_EXISTING)
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::from_lookup(e, "Member not found"))
}

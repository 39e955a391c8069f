use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::models::notification::Notification;

pub async fn insert_notification<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    member_id: i32,
    bmi_record_id: i32,
) -> Res<Notification> {
    sqlx::query_as::<_, Notification>(
        "INSERT INTO notifications (member_id, bmi_record_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(member_id)
    .bind(bmi_record_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_whatsapp_status<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
    sent: bool,
    status: &str,
) -> Res<()> {
    sqlx::query("UPDATE notifications SET whatsapp_sent = $2, whatsapp_status = $3 WHERE id = $1")
        .bind(id)
        .bind(sent)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn set_email_status<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
    sent: bool,
    status: &str,
) -> Res<()> {
    sqlx::query("UPDATE notifications SET email_sent = $2, email_status = $3 WHERE id = $1")
        .bind(id)
        .bind(sent)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn list_notifications_for_record<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    bmi_record_id: i32,
) -> Res<Vec<Notification>> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE bmi_record_id = $1 ORDER BY id",
    )
    .bind(bmi_record_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

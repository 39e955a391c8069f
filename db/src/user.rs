use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::{
    dtos::user::{StaffUserCreateRequest, StaffUserUpdateRequest},
    models::user::StaffUser,
};

pub async fn count_users<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM staff_users")
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_users<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<StaffUser>> {
    sqlx::query_as::<_, StaffUser>("SELECT * FROM staff_users ORDER BY id")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn find_user_by_username<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    username: &str,
) -> Res<Option<StaffUser>> {
    sqlx::query_as::<_, StaffUser>("SELECT * FROM staff_users WHERE username = $1")
        .bind(username)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
) -> Res<StaffUser> {
    sqlx::query_as::<_, StaffUser>("SELECT * FROM staff_users WHERE id = $1")
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::from_lookup(e, "User not found"))
}

/// True when another user (other than `exclude_id`) already has `username`.
pub async fn username_taken<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    username: &str,
    exclude_id: Option<i32>,
) -> Res<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM staff_users WHERE username = $1 AND ($2::INT IS NULL OR id <> $2))",
    )
    .bind(username)
    .bind(exclude_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: StaffUserCreateRequest,
) -> Res<StaffUser> {
    sqlx::query_as::<_, StaffUser>(
        r#"
        INSERT INTO staff_users (username, password_hash, role, is_active)
        VALUES ($1, $2, $3, TRUE)
        RETURNING *
        "#,
    )
    .bind(data.username)
    .bind(data.password_hash)
    .bind(data.role.as_str())
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
    data: StaffUserUpdateRequest,
) -> Res<StaffUser> {
    sqlx::query_as::<_, StaffUser>(
        r#"
        UPDATE staff_users
        SET username = $2, password_hash = $3, role = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(data.username)
    .bind(data.password_hash)
    .bind(data.role.as_str())
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::from_lookup(e, "User not found"))
}

/// Returns whether a row was removed.
pub async fn delete_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: i32,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM staff_users WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

use common::{
    env_config::SeedAdmin,
    error::{AppError, Res},
    misc::StaffRole,
};
use db::{
    dtos::user::{StaffUserCreateRequest, StaffUserUpdateRequest},
    models::user::StaffUser,
};
use sqlx::PgPool;

use crate::{dtos::auth::ValidUser, services::password};

const USERNAME_TAKEN: &str = "Username already exists";

pub async fn list_users(pool: &PgPool) -> Res<Vec<StaffUser>> {
    db::user::list_users(pool).await
}

pub async fn create_user(pool: &PgPool, data: ValidUser) -> Res<StaffUser> {
    if db::user::username_taken(pool, &data.username, None).await? {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = password::hash_password(&data.password)?;
    db::user::insert_user(
        pool,
        StaffUserCreateRequest {
            username: data.username,
            password_hash,
            role: data.role,
        },
    )
    .await
}

pub async fn update_user(pool: &PgPool, id: i32, data: ValidUser) -> Res<StaffUser> {
    // 404 before 409
    db::user::get_user_by_id(pool, id).await?;

    if db::user::username_taken(pool, &data.username, Some(id)).await? {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = password::hash_password(&data.password)?;
    db::user::update_user(
        pool,
        id,
        StaffUserUpdateRequest {
            username: data.username,
            password_hash,
            role: data.role,
        },
    )
    .await
}

pub async fn delete_user(pool: &PgPool, id: i32) -> Res<()> {
    if db::user::delete_user(pool, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("User not found".to_string()))
    }
}

/// Creates the configured admin account when no staff user exists yet.
/// Returns whether an account was created.
pub async fn seed_admin(pool: &PgPool, seed: &SeedAdmin) -> Res<bool> {
    if db::user::count_users(pool).await? > 0 {
        return Ok(false);
    }

    let password_hash = password::hash_password(&seed.password)?;
    let user = db::user::insert_user(
        pool,
        StaffUserCreateRequest {
            username: seed.username.trim().to_string(),
            password_hash,
            role: StaffRole::Admin,
        },
    )
    .await?;
    log::info!("Created initial admin account '{}'", user.username);
    Ok(true)
}

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use std::{str::FromStr, sync::Arc, time::Duration};

pub mod bmi;
pub mod member;
pub mod notification;
pub mod user;

pub mod models {
    pub mod bmi;
    pub mod member;
    pub mod notification;
    pub mod user;
}

pub mod dtos {
    pub mod bmi;
    pub mod member;
    pub mod user;
}

fn connect_options(url: &str, require_ssl: bool) -> Result<PgConnectOptions, sqlx::Error> {
    let options = PgConnectOptions::from_str(url)?;
    Ok(if require_ssl {
        options.ssl_mode(PgSslMode::Require)
    } else {
        options
    })
}

/// Connects to `database_url`, creating the database first if it does not
/// exist, then applies pending migrations.
pub async fn setup(
    database_url: &str,
    require_ssl: bool,
) -> Result<Arc<PgPool>, Box<dyn std::error::Error>> {
    let mut admin_url = url::Url::parse(database_url)?;
    let db_name = admin_url.path().trim_start_matches('/').to_string();
    admin_url.set_path("/postgres");

    let admin_pool = PgPool::connect_with(connect_options(admin_url.as_str(), require_ssl)?).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&admin_pool)
            .await?;

    if !exists {
        log::info!("Creating database {}", db_name);
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name))
            .execute(&admin_pool)
            .await?;
    }
    admin_pool.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options(database_url, require_ssl)?)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database ready, migrations applied");

    Ok(Arc::new(pool))
}

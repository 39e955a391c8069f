mod cors;

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;
use limiter::store::FixedWindowStore;
use notify::{
    LogWhatsApp, NotificationPipeline, PgLedger, ReportGenerator, SmtpMailer,
    StorageImageSource, ports::Mailer,
};
use storage::StorageClient;

fn spawn_sweeper(store: Arc<FixedWindowStore>) {
    actix_web::rt::spawn(async move {
        let mut ticker = actix_web::rt::time::interval(limiter::SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = store.sweep(std::time::Instant::now());
            if removed > 0 {
                log::debug!("Swept {} expired rate limit windows", removed);
            }
        }
    });
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();
    let cookie_secure = !origin.contains("localhost");

    // init logger
    if config.console_logging_enabled {
        logger::setup("gymdesk.log").expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    if let Some(seed) = &config.seed_admin {
        match api_auth::services::user::seed_admin(&pool, seed).await {
            Ok(true) => log::info!("Created initial admin {}", seed.username),
            Ok(false) => {}
            Err(e) => log::error!("Could not seed admin user: {}", e),
        }
    }

    // outbound clients
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .expect("Failed to build HTTP client");
    let storage = Arc::new(StorageClient::new(
        &config.storage.url,
        &config.storage.service_key,
        http_client,
    ));

    let mailer: Option<Arc<dyn Mailer>> = if config.mail.is_complete() {
        Some(Arc::new(
            SmtpMailer::new(&config.mail, config.http_timeout).expect("Failed to set up mailer"),
        ))
    } else {
        log::warn!(
            "Email disabled, missing: {}",
            config.mail.missing().join(", ")
        );
        None
    };

    let logo = match std::fs::read(&config.gym.logo_path) {
        Ok(bytes) => Some(Arc::new(bytes)),
        Err(e) => {
            log::warn!("Logo {} not loaded: {}", config.gym.logo_path, e);
            None
        }
    };

    let images = Arc::new(StorageImageSource::new(storage.clone(), &config.storage.bucket));
    let reports = Arc::new(ReportGenerator::new(images, config.gym.clone(), logo));
    let pipeline = Arc::new(NotificationPipeline::new(
        Arc::new(PgLedger::new(pool.clone())),
        Arc::new(LogWhatsApp),
        mailer,
        reports,
        config.gym.clone(),
    ));

    // rate limit windows, one store per policy
    let login_store = Arc::new(FixedWindowStore::new(config.rate_limit_max_keys));
    let api_store = Arc::new(FixedWindowStore::new(config.rate_limit_max_keys));
    spawn_sweeper(login_store.clone());
    spawn_sweeper(api_store.clone());

    let global_limiter = limiter::global_middleware(config.global_rps);

    HttpServer::new(move || {
        let secret = config_data.jwt_config.secret.as_bytes();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(pipeline.clone()))
            .app_data(web::Data::new(storage.clone()))
            .wrap(global_limiter.clone())
            .wrap(logger::middleware()) // 4th
            .wrap(extractor::middleware()) // 3rd
            .wrap(cors::middleware(&origin)) // 2nd
            .wrap(api_auth::session_middleware(
                cookie_secure,
                is_production,
                secret,
            )) // 1st
            .service(
                web::scope("/api")
                    .service(api_auth::mount_auth(login_store.clone()))
                    .service(
                        web::scope("")
                            .wrap(api_auth::auth_middleware())
                            .service(api_members::mount_members(api_store.clone()))
                            .service(api_media::mount_media()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}

use std::sync::Arc;

use actix_session::{SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore};
use actix_web::{
    Scope,
    body::BoxBody,
    cookie::{Key, SameSite},
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use common::misc::StaffRole;
use limiter::{policy::WindowPolicy, store::FixedWindowStore};
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}
pub mod routes {
    pub mod auth;
    pub mod session;
    pub mod users;
}
pub mod dtos {
    pub mod auth;
}
pub mod services {
    pub mod auth;
    pub mod password;
    pub mod user;
}

pub fn mount_auth(login_store: Arc<FixedWindowStore>) -> Scope {
    web::scope("/auth")
        .service(
            web::resource("/db-login")
                .wrap(limiter::window_middleware(login_store, WindowPolicy::login()))
                .route(web::post().to(routes::auth::post_db_login)),
        )
        .service(routes::session::get_session)
        .service(routes::auth::post_logout)
        .service(mount_users())
}

fn mount_users() -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/users")
        .wrap(admin_middleware())
        .service(routes::users::get_users)
        .service(routes::users::post_user)
        .service(routes::users::put_user)
        .service(routes::users::delete_user)
}

/// Any signed-in staff member.
pub fn auth_middleware() -> AuthMiddleware {
    AuthMiddleware::new(None)
}

pub fn admin_middleware() -> AuthMiddleware {
    AuthMiddleware::new(Some(StaffRole::Admin))
}

/// Signed, private cookie session. `secret` must be at least 32 bytes.
pub fn session_middleware(
    cookie_secure: bool,
    is_production: bool,
    secret: &[u8],
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::derive_from(secret))
        .cookie_name("gymdesk_session".to_string())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(if is_production {
            SameSite::Strict
        } else {
            SameSite::Lax
        })
        .build()
}

use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::{error::AppError, jwt, misc::StaffRole};
use futures::future::{Ready, ok};

/// Requires a valid staff session, optionally with a specific role.
///
/// Relies on the extraction middleware having validated the bearer token;
/// on success the claims are exposed to handlers as `web::ReqData<JwtClaims>`.
pub struct AuthMiddleware {
    required_role: Option<StaffRole>,
}

impl AuthMiddleware {
    pub fn new(required_role: Option<StaffRole>) -> Self {
        AuthMiddleware { required_role }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Arc::new(service),
            required_role: self.required_role,
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
    required_role: Option<StaffRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Arc::clone(&self.service);
        let required_role = self.required_role;

        Box::pin(async move {
            let claims = match jwt::get_jwt_claims_or_error(&req) {
                Ok(claims) => claims,
                Err(response) => return Ok(req.into_response(response)),
            };

            if let Some(role) = required_role {
                if claims.role != role {
                    log::warn!(
                        "{} ({}) denied access to {}",
                        claims.username,
                        claims.role,
                        req.path()
                    );
                    return Ok(req.error_response(AppError::Forbidden(
                        "Insufficient permissions".to_string(),
                    )));
                }
            }

            req.extensions_mut().insert(claims);
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}

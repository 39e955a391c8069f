use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::web;
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use actix_web::{HttpMessage, HttpResponse, ResponseError};
use colored::Colorize;
use common::context::{ClientIdentity, RequestContext};
use common::env_config::Config;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// One console line per request. Request bodies are never read here since
/// they may carry credentials or large uploads.
pub struct LoggerMiddleware {}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
    <B as MessageBody>::Error: ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Arc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
    <B as MessageBody>::Error: ResponseError,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query_string = req.query_string().to_string();
        let client = ClientIdentity::from_headers(req.headers());

        let console_logging_enabled = req
            .app_data::<web::Data<Arc<Config>>>()
            .map(|config| config.console_logging_enabled)
            .unwrap_or(true);
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let res = srv.call(req).await?;

            if !console_logging_enabled {
                return Ok(res.map_into_boxed_body());
            }

            let status = res.status();
            let status_code = status.as_u16();
            let elapsed_ms = started.elapsed().as_millis();
            let staff = res
                .request()
                .extensions()
                .get::<RequestContext>()
                .and_then(|ctx| ctx.staff.as_ref().map(|claims| claims.username.clone()));

            let colored_status = match status_code {
                200..=299 => status_code.to_string().green(),
                300..=399 => status_code.to_string().yellow(),
                400..=499 => status_code.to_string().bright_red(),
                _ => status_code.to_string().red(),
            };

            let colored_method = match method.as_str() {
                "GET" => method.blue(),
                "POST" => method.yellow(),
                "PUT" => method.purple(),
                "DELETE" => method.red(),
                _ => method.normal(),
            };

            let target = if query_string.is_empty() {
                path
            } else {
                format!("{}?{}", path, query_string)
            };

            info!(
                "[{}] {} {} {} client={} staff={}",
                colored_status,
                colored_method,
                target.bright_white(),
                format!("({}ms)", elapsed_ms).bright_black(),
                client.as_str().bright_cyan(),
                staff.unwrap_or_else(|| "None".to_string()).bright_blue(),
            );

            if status_code < 400 {
                return Ok(res.map_into_boxed_body());
            }

            // Error bodies are small JSON documents; echo them at debug level.
            let (req, res) = res.into_parts();
            let headers = res.headers().clone();
            let response_body_bytes = body::to_bytes(res.into_body()).await?;
            if let Ok(response_body) = serde_json::from_slice::<Value>(&response_body_bytes) {
                debug!(
                    "  Response: {}",
                    response_body.to_string().bright_yellow()
                );
            }

            let mut new_res = HttpResponse::build(status);
            for (key, value) in headers.iter() {
                new_res.insert_header((key.clone(), value.clone()));
            }
            Ok(ServiceResponse::new(req, new_res.body(response_body_bytes)))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    use super::*;

    #[actix_web::test]
    async fn passes_error_bodies_through_untouched() {
        let app = test::init_service(
            App::new().wrap(LoggerMiddleware::new()).route(
                "/",
                web::get().to(|| async {
                    HttpResponse::NotFound().json(serde_json::json!({ "error": "Member not found" }))
                }),
            ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Member not found");
    }
}

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::{context::ClientIdentity, error::AppError};
use std::{future::Future, pin::Pin, rc::Rc, sync::Arc, time::Instant};

use crate::{
    policy::WindowPolicy,
    store::{Decision, FixedWindowStore},
};

/// Counts requests per client address against a [`WindowPolicy`].
pub struct FixedWindowLimiter {
    store: Arc<FixedWindowStore>,
    policy: Arc<WindowPolicy>,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<FixedWindowStore>, policy: WindowPolicy) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for FixedWindowLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = FixedWindowLimiterService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(FixedWindowLimiterService {
            service: Rc::new(service),
            store: self.store.clone(),
            policy: self.policy.clone(),
        }))
    }
}

pub struct FixedWindowLimiterService<S> {
    service: Rc<S>,
    store: Arc<FixedWindowStore>,
    policy: Arc<WindowPolicy>,
}

impl<S, B> Service<ServiceRequest> for FixedWindowLimiterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let store = self.store.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let client = ClientIdentity::from_headers(req.headers());

            match store.check(client.as_str(), &policy, Instant::now()) {
                Decision::Allowed { .. } => srv.call(req).await.map(|res| res.map_into_boxed_body()),
                Decision::Limited { .. } => {
                    log::warn!("Rate limit hit for {} on {}", client, req.path());
                    Ok(req.error_response(AppError::TooManyRequests(policy.message.clone())))
                }
            }
        })
    }
}

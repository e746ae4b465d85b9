//! Access control middleware for the drinks server.
//! This middleware can be placed on any route or service.
//!
//! It reads the bearer token from the `Authorization` header, verifies it with the [`TokenVerifier`] that has been
//! registered as application data, and checks that the verified claims grant the permission required by the route.
//! If they do, the claims are stored in the request extensions, where handlers can pick them up with a [`ClaimSet`]
//! argument. Otherwise the request is rejected with a 401 or 403 response and the handler is never called.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::{check_permission, ClaimSet, TokenVerifier},
    errors::ServerError,
    helpers::extract_bearer_token,
};

pub struct AclMiddlewareFactory {
    required_permission: &'static str,
}

impl AclMiddlewareFactory {
    pub fn new(required_permission: &'static str) -> Self {
        AclMiddlewareFactory { required_permission }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_permission: self.required_permission, service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_permission: &'static str,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_permission = self.required_permission;
        Box::pin(async move {
            match authorize(&req, required_permission).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => {
                    debug!("🔐️ {} {} was rejected. {e}", req.method(), req.path());
                    Ok(req.error_response(e).map_into_right_body())
                },
            }
        })
    }
}

async fn authorize(req: &ServiceRequest, required_permission: &str) -> Result<ClaimSet, ServerError> {
    let verifier = req.app_data::<web::Data<TokenVerifier>>().cloned().ok_or_else(|| {
        error!("🔐️ No token verifier has been registered with the server. Protected routes are unreachable.");
        ServerError::ConfigurationError("No token verifier".into())
    })?;
    let token = extract_bearer_token(req.headers())?;
    let claims = verifier.verify(token).await?;
    check_permission(&claims, required_permission)?;
    trace!("🔐️ {} holds {required_permission}", claims.subject());
    Ok(claims)
}

//! Access control list middleware for the Bistro server.
//! This middleware can be placed on any route or service.
//!
//! It checks the incoming request for a `Authorization: Bearer <jwt>` header, validates the token,
//! and then checks the claims in the token against the required roles for the route. If the token
//! is valid and the user has the required roles, the validated claims are placed in the request
//! extensions and the request continues. Otherwise, a 401 or 403 response is returned.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized},
    web,
    Error,
    HttpMessage,
};
use bistro_engine::db_types::Role;
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::auth::TokenVerifier;

pub struct AclMiddlewareFactory {
    required_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(required_roles: &[Role]) -> Self {
        AclMiddlewareFactory { required_roles: required_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_roles: self.required_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_roles = self.required_roles.clone();
        Box::pin(async move {
            let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
                log::warn!("No token verifier found in app data");
                ErrorInternalServerError("No token verifier found in app data")
            })?;
            let token = bearer_token(&req).ok_or_else(|| ErrorUnauthorized("No access token was provided."))?;
            let claims = verifier.validate_token(&token).map_err(|e| {
                log::debug!("💻️ Token validation failed: {e}");
                ErrorUnauthorized(e)
            })?;
            if required_roles.iter().all(|role| claims.roles.contains(role)) {
                req.extensions_mut().insert(claims);
                service.call(req).await
            } else {
                Err(ErrorForbidden("Insufficient permissions"))
            }
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
}

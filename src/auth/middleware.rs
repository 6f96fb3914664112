use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::session::SessionIssuer;

/// Authentication boundary.
///
/// Constructed with the process-wide `SessionIssuer`; every request outside
/// the public surface must carry `Authorization: Bearer <jwt>`. On success the
/// acting user's id is inserted into request extensions for the
/// `AuthenticatedUserId` extractor; any failure yields a generic 401 before
/// handler logic runs.
pub struct AuthMiddleware {
    issuer: SessionIssuer,
}

impl AuthMiddleware {
    pub fn new(issuer: SessionIssuer) -> Self {
        Self { issuer }
    }
}

/// The unauthenticated surface: health probe plus the account-lifecycle
/// endpoints a user needs before having a session. `update-password/{token}`
/// is public (reset by emailed code); the bare `update-password` is the
/// authenticated password change and is not.
fn is_public(path: &str) -> bool {
    const PUBLIC: [&str; 6] = [
        "/api/auth/create-account",
        "/api/auth/confirm-account",
        "/api/auth/login",
        "/api/auth/request-code",
        "/api/auth/forgot-password",
        "/api/auth/validate-token",
    ];

    path == "/health"
        || PUBLIC.contains(&path)
        || path
            .strip_prefix("/api/auth/update-password/")
            .is_some_and(|rest| !rest.is_empty())
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            issuer: self.issuer.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    issuer: SessionIssuer,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match auth_header {
            Some(credential) => match self.issuer.validate(credential) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims.sub);
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
            },
            None => {
                let app_err = crate::error::AppError::Unauthorized("Not authorized".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}

use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Extracts the authenticated user's id from request extensions.
///
/// Intended for routes behind `AuthMiddleware`, which validates the session
/// credential and inserts the id. If the id is missing the extractor fails
/// with the same generic 401 the middleware produces.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub Uuid);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError; // AppError converts via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Uuid>().copied() {
            Some(user_id) => ready(Ok(AuthenticatedUserId(user_id))),
            None => {
                // Only reachable when a handler is mounted outside the
                // middleware; reject rather than guess.
                let err = AppError::Unauthorized("Not authorized".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_authenticated_user_id_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        let user_id = Uuid::new_v4();
        req.extensions_mut().insert(user_id);

        let mut payload = Payload::None;
        let extracted = AuthenticatedUserId::from_request(&req, &mut payload).await;
        assert!(extracted.is_ok());
        assert_eq!(extracted.unwrap().0, user_id);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_id_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();
        // No user id inserted into extensions

        let mut payload = Payload::None;
        let result = AuthenticatedUserId::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let err = result.unwrap_err();
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

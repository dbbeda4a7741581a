use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::AuthGateway;
use crate::error::AppError;

/// Requires a valid `Authorization: Bearer <token>` header on every request it wraps.
///
/// On success the resolved `CurrentUser` is stored in request extensions; otherwise
/// the request is answered with 401 before reaching the handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let resolved = match req.app_data::<web::Data<AuthGateway>>() {
            Some(gateway) => match bearer_token(&req) {
                Some(token) => gateway.resolve_current_user(token),
                None => Err(AppError::Unauthorized("Not authenticated".into())),
            },
            None => Err(AppError::InternalServerError(
                "AuthGateway is not registered".into(),
            )),
        };

        match resolved {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                let response = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CurrentUser, PasswordHasher, TokenService};
    use crate::db::{test_support::memory_db, UserStore};
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use chrono::Duration;

    async fn whoami(user: CurrentUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0)
    }

    async fn gateway() -> AuthGateway {
        AuthGateway::new(
            UserStore::new(memory_db().await),
            PasswordHasher::new(4),
            TokenService::new("middleware-secret", Duration::minutes(5)),
        )
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler() {
        let gateway = gateway().await;
        let token = TokenService::new("middleware-secret", Duration::minutes(5))
            .issue("alice")
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(gateway))
                .service(web::resource("/me").wrap(AuthMiddleware).to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "alice");
    }

    #[actix_rt::test]
    async fn test_missing_or_invalid_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(gateway().await))
                .service(web::resource("/me").wrap(AuthMiddleware).to(whoami)),
        )
        .await;

        for header_value in [None, Some("Bearer garbage"), Some("Basic YWxpY2U6cHcx")] {
            let mut req = test::TestRequest::get().uri("/me");
            if let Some(value) = header_value {
                req = req.insert_header((header::AUTHORIZATION, value));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(
                resp.status(),
                StatusCode::UNAUTHORIZED,
                "header: {:?}",
                header_value
            );
            assert_eq!(
                resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }
}

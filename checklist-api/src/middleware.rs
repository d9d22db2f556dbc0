use crate::auth::validate_token;
use crate::error::AppError;
use crate::handlers::AppState;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};

const LOGIN_PATH: &str = "/api/admin/login";

/// Username of the authenticated admin, stored in request extensions
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

/// Requires a valid admin bearer token on every request except login
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthService { service }))
    }
}

pub struct AdminAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminAuthService<S>
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
        if req.path().trim_end_matches('/') == LOGIN_PATH {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        match authenticate(&req) {
            Ok(identity) => {
                tracing::debug!(admin = %identity.username, path = req.path(), "Admin request authorized");
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(err) => {
                tracing::warn!(path = req.path(), error = %err, "Admin auth failed");
                let response = err.error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AdminIdentity, AppError> {
    let jwt_secret = req
        .app_data::<web::Data<AppState>>()
        .and_then(|state| state.config.admin.as_ref())
        .map(|admin| admin.jwt_secret.clone())
        .ok_or_else(|| AppError::Unauthorized("Admin access is not configured".to_string()))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized(
            "Invalid Authorization header format. Expected 'Bearer <token>'".to_string(),
        )
    })?;

    let claims = validate_token(token, &jwt_secret)?;
    Ok(AdminIdentity {
        username: claims.sub,
    })
}

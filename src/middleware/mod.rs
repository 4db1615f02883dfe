/// Request identity for blog-service
///
/// `AuthUser` is an extractor that validates the `Authorization: Bearer`
/// header against the shared `TokenService` and hands the caller's
/// identity to the handler. Public and authenticated operations share
/// paths (GET vs POST on `/comments`), so authentication hangs off the
/// handler signature rather than a scope-wide wrapper: any handler that
/// takes an `AuthUser` rejects unauthenticated callers before running.
use actix_web::{web, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::TokenService;

/// Caller identity extracted from validated token claims.
///
/// The service trusts these values as given by the identity provider;
/// no further lookup happens per request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub is_admin: bool,
}

impl AuthUser {
    /// Admin gate for the management endpoints
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin only".to_string()))
        }
    }

    fn extract(req: &HttpRequest) -> Result<Self, AppError> {
        let tokens = req
            .app_data::<web::Data<TokenService>>()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("TokenService not configured")))?;

        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = tokens.verify(token)?;

        Ok(AuthUser {
            id: claims.sub,
            is_admin: claims.is_admin,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Self::extract(req).map_err(Into::into))
    }
}

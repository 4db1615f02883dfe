/// Registration and credentials login
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{CreateUserRequest, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::auth::{self, TokenService};
use crate::services::UserService;

/// Self-service registration (never grants admin)
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = UserService::new((**pool).clone());
    let user = service
        .create_user(&CreateUserRequest {
            username: req.username.clone(),
            email: req.email.clone(),
            name: req.name.clone(),
            password: req.password.clone(),
            image: req.image.clone(),
            is_admin: false,
        })
        .await?;

    Ok(HttpResponse::Created().json(user))
}

/// Credentials login; returns a bearer token carrying id + admin flag
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = UserService::new((**pool).clone());
    let user = service
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let stored_hash = user.password_hash.as_deref().ok_or(AppError::Unauthorized)?;
    if !auth::verify_password(&req.password, stored_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = tokens.issue(user.id, user.is_admin)?;

    Ok(HttpResponse::Ok().json(LoginResponse { token, user }))
}

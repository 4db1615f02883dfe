/// User management handlers (admin-only)
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreateUserRequest, UpdateUserRequest};
use crate::services::UserService;

#[derive(Deserialize)]
pub struct UserListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

/// Paged user listing, excluding the caller (admin-only)
pub async fn get_users(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse> {
    user.require_admin()?;

    let service = UserService::new((**pool).clone());
    let response = service
        .get_users(query.page, query.search.as_deref(), user.id)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Create a user, optionally an admin (admin-only)
pub async fn create_user(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    user.require_admin()?;
    req.validate()?;

    let service = UserService::new((**pool).clone());
    let created = service.create_user(&req).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Update a user; blank password leaves credentials alone (admin-only)
pub async fn update_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    user: AuthUser,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    user.require_admin()?;
    req.validate()?;

    let service = UserService::new((**pool).clone());
    let updated = service.update_user(*user_id, &req).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Delete a user (admin-only)
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    user: AuthUser,
) -> Result<HttpResponse> {
    user.require_admin()?;

    let service = UserService::new((**pool).clone());
    service.delete_user(*user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

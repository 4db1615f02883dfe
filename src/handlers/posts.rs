/// Post handlers - public reading plus admin-only CRUD
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{PostCategory, PostRequest};
use crate::services::{CommentService, PostService};

#[derive(Deserialize)]
pub struct PostListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    pub search: Option<String>,
    pub category: Option<PostCategory>,
    pub sort: Option<String>,
}

fn default_page() -> i64 {
    1
}

/// Paged post listing with search/category/sort (public)
pub async fn get_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let sort_popular = query.sort.as_deref() == Some("popular");
    let response = service
        .get_posts(
            query.page,
            query.search.as_deref(),
            query.category,
            sort_popular,
        )
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Three most recent featured posts (public)
pub async fn get_featured_posts(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let posts = service.get_featured_posts().await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Single post with author fields (public)
pub async fn get_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    match service.get_post(*post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

/// Posts in the same category as the given one (public)
pub async fn get_related_posts(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let posts = service.get_related_posts(*post_id).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Bump a post's visit counter (public, fired on each view)
pub async fn increment_visit(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.increment_visit(*post_id).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Create a post (admin-only)
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    user.require_admin()?;
    req.validate()?;

    let service = PostService::new((**pool).clone());
    let post = service.create_post(user.id, &req).await?;

    Ok(HttpResponse::Created().json(post))
}

/// Update a post (admin-only)
pub async fn update_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user: AuthUser,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    user.require_admin()?;
    req.validate()?;

    let service = PostService::new((**pool).clone());
    let post = service.update_post(*post_id, &req).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post and cascade its comments (admin-only).
///
/// Explicit two-step: remove the post, then bulk-remove its comments.
/// A failure after the first step leaves orphaned comments, which are
/// unreachable rather than corrupting.
pub async fn delete_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user: AuthUser,
) -> Result<HttpResponse> {
    user.require_admin()?;

    let posts = PostService::new((**pool).clone());
    posts.delete_post(*post_id).await?;

    let comments = CommentService::new((**pool).clone());
    let removed = comments.delete_comments_for_post(*post_id).await?;
    tracing::info!(post_id = %post_id, comments_removed = removed, "post deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "commentsRemoved": removed })))
}

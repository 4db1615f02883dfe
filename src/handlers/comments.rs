/// Comment handlers - feed reading, writing, and reaction toggles
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreateCommentRequest, ReactionKind, UpdateCommentRequest};
use crate::services::{CommentService, ReactionService};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFeedQuery {
    pub post_id: Uuid,
    #[serde(default)]
    pub cursor: i64,
}

/// One page of a post's comment feed (public)
pub async fn get_post_comments(
    pool: web::Data<PgPool>,
    query: web::Query<CommentFeedQuery>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    let page = service.get_post_comments(query.post_id, query.cursor).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Create a new comment
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = CommentService::new((**pool).clone());
    let comment = service
        .create_comment(req.post_id, user.id, &req.description)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Replace a comment's text (author-only)
pub async fn update_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user: AuthUser,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = CommentService::new((**pool).clone());
    let comment = service
        .update_comment(*comment_id, user.id, &req.description)
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment (author-only)
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    service.delete_comment(*comment_id, user.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Toggle a like on a comment
pub async fn like_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let service = ReactionService::new((**pool).clone());
    let state = service
        .toggle(*comment_id, user.id, ReactionKind::Like)
        .await?;

    Ok(HttpResponse::Ok().json(state))
}

/// Toggle a dislike on a comment
pub async fn dislike_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let service = ReactionService::new((**pool).clone());
    let state = service
        .toggle(*comment_id, user.id, ReactionKind::Dislike)
        .await?;

    Ok(HttpResponse::Ok().json(state))
}

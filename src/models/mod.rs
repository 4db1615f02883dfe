/// Data models for blog-service
///
/// Entities map 1:1 onto the tables in `migrations/`, request/response
/// types onto the JSON bodies the handlers speak. Password hashes never
/// leave the service: `User` skips the field during serialization.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Post category taxonomy, fixed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    General,
    Technology,
    Health,
    Sports,
    Education,
}

/// Which reaction set a user occupies on a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn opposite(self) -> Self {
        match self {
            ReactionKind::Like => ReactionKind::Dislike,
            ReactionKind::Dislike => ReactionKind::Like,
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post entity
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub img: Option<String>,
    pub category: PostCategory,
    pub is_featured: bool,
    pub visit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post joined with its author's display fields
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub img: Option<String>,
    pub category: PostCategory,
    pub is_featured: bool,
    pub visit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
    pub user_image: Option<String>,
}

/// Comment entity
///
/// `likes_count` / `dislikes_count` are denormalized caches of the
/// reaction-set cardinalities and only ever move in the same transaction
/// as the membership change.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub description: String,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Feed item: a comment denormalized at read time with its author's
/// display name/avatar and the two reaction-set membership arrays.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommentFeedItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub description: String,
    pub likes: Vec<Uuid>,
    pub likes_count: i64,
    pub dislikes: Vec<Uuid>,
    pub dislikes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
    pub user_image: Option<String>,
}

/// One page of the comment feed plus the next opaque cursor
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<CommentFeedItem>,
    pub next_cursor: Option<i64>,
}

/// Resulting reaction state returned by the toggler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionStatus {
    Liked,
    Disliked,
    Neutral,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionState {
    pub status: ReactionStatus,
    pub likes_count: i64,
    pub dislikes_count: i64,
}

// ---------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub img: Option<String>,
    pub category: PostCategory,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 2, max = 20, message = "Name must be 2-20 characters long"))]
    pub name: String,
    #[validate(
        length(min = 8, max = 20, message = "Password must be 8-20 characters long"),
        custom(function = validate_password_charset)
    )]
    pub password: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters long"))]
    pub username: String,
    #[validate(length(min = 8, max = 20, message = "Password must be 8-20 characters long"))]
    pub password: String,
}

/// Admin create: register fields plus the admin flag
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 2, max = 20, message = "Name must be 2-20 characters long"))]
    pub name: String,
    #[validate(
        length(min = 8, max = 20, message = "Password must be 8-20 characters long"),
        custom(function = validate_password_charset)
    )]
    pub password: String,
    pub image: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Admin update: empty/missing password means "leave unchanged"
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 20, message = "Name must be 2-20 characters long"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Passwords need at least one letter and one digit
pub fn validate_password_charset(password: &str) -> Result<(), validator::ValidationError> {
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_letter && has_digit {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("password_charset");
        err.message = Some("Password must contain at least one letter and one number".into());
        Err(err)
    }
}

// ---------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub total_posts: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total_users: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

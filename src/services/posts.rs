/// Post service - public listing/search, featured/related rails, the
/// visit counter, and the admin-only CRUD.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Post, PostCategory, PostListResponse, PostRequest, PostWithAuthor};

/// Admin/table page size
pub const ITEMS_PER_PAGE: i64 = 4;

const POST_COLUMNS: &str =
    "id, user_id, title, description, img, category, is_featured, visit, created_at, updated_at";

#[derive(Clone)]
pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Paged post listing with optional title search, category filter,
    /// and popularity sort. Pages are 1-based.
    pub async fn get_posts(
        &self,
        page: i64,
        search: Option<&str>,
        category: Option<PostCategory>,
        sort_popular: bool,
    ) -> Result<PostListResponse> {
        let page = page.max(1);
        let order_clause = if sort_popular {
            "visit DESC"
        } else {
            "created_at DESC"
        };

        let query = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::post_category IS NULL OR category = $2)
            ORDER BY {order_clause}
            LIMIT $3 OFFSET $4
            "#
        );

        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(search)
            .bind(category)
            .bind(ITEMS_PER_PAGE)
            .bind(ITEMS_PER_PAGE * (page - 1))
            .fetch_all(&self.pool)
            .await?;

        let total_posts: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM posts
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::post_category IS NULL OR category = $2)
            "#,
        )
        .bind(search)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        Ok(PostListResponse { posts, total_posts })
    }

    /// Three most recent featured posts
    pub async fn get_featured_posts(&self) -> Result<Vec<Post>> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE is_featured ORDER BY created_at DESC LIMIT 3"
        );
        let posts = sqlx::query_as::<_, Post>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Single post with its author's display fields joined in
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<PostWithAuthor>> {
        let post = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.user_id, p.title, p.description, p.img, p.category,
                   p.is_featured, p.visit, p.created_at, p.updated_at,
                   u.name AS user_name, u.image AS user_image
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Up to 4 most recent posts in the same category, excluding the post itself
    pub async fn get_related_posts(&self, post_id: Uuid) -> Result<Vec<Post>> {
        let query = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE category = (SELECT category FROM posts WHERE id = $1)
              AND id <> $1
            ORDER BY created_at DESC
            LIMIT 4
            "#
        );

        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Atomic visit-counter increment, fired on each post view
    pub async fn increment_visit(&self, post_id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE posts SET visit = visit + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }

    /// Create a post. Titles are unique; the pre-check gives a clean 409
    /// instead of a raw constraint violation.
    pub async fn create_post(&self, user_id: Uuid, req: &PostRequest) -> Result<Post> {
        let title_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE title = $1)")
                .bind(&req.title)
                .fetch_one(&self.pool)
                .await?;

        if title_taken {
            return Err(AppError::Conflict("Title already exists".to_string()));
        }

        let query = format!(
            r#"
            INSERT INTO posts (user_id, title, description, img, category, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(&req.img)
            .bind(req.category)
            .bind(req.is_featured)
            .fetch_one(&self.pool)
            .await?;

        Ok(post)
    }

    /// Update a post; the title-uniqueness check excludes the post itself
    pub async fn update_post(&self, post_id: Uuid, req: &PostRequest) -> Result<Post> {
        let title_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE title = $1 AND id <> $2)",
        )
        .bind(&req.title)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        if title_taken {
            return Err(AppError::Conflict("Title is already taken".to_string()));
        }

        let query = format!(
            r#"
            UPDATE posts
            SET title = $2, description = $3, img = $4, category = $5,
                is_featured = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(&req.img)
            .bind(req.category)
            .bind(req.is_featured)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        Ok(post)
    }

    /// Remove the post row. The caller follows up with the comment bulk
    /// delete; the two steps are deliberately separate (best-effort
    /// cascade, orphans tolerated).
    pub async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }
}

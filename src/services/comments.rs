/// Comment service - creation, owner-restricted update/delete, and the
/// paginated feed reader.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentFeedItem, CommentPage};

/// Fixed feed page size
pub const COMMENT_PAGE_SIZE: i64 = 2;

#[derive(Clone)]
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a single comment by ID
    pub async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, post_id, description, likes_count, dislikes_count,
                   created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// One page of a post's comment feed, newest first.
    ///
    /// Each item carries the author's name/avatar (joined at read time)
    /// and the reaction-set membership arrays. `next_cursor` uses the
    /// page-full heuristic: a full page assumes another one exists, so an
    /// exactly-full final page reports one extra (empty) page. Known
    /// boundary behavior, kept as-is.
    ///
    /// An unknown post id yields an empty page, not an error.
    pub async fn get_post_comments(&self, post_id: Uuid, cursor: i64) -> Result<CommentPage> {
        let cursor = cursor.max(0);
        let offset = cursor * COMMENT_PAGE_SIZE;

        let comments = sqlx::query_as::<_, CommentFeedItem>(
            r#"
            SELECT c.id, c.user_id, c.post_id, c.description,
                   ARRAY(SELECT r.user_id FROM comment_reactions r
                         WHERE r.comment_id = c.id AND r.reaction = 'like') AS likes,
                   c.likes_count,
                   ARRAY(SELECT r.user_id FROM comment_reactions r
                         WHERE r.comment_id = c.id AND r.reaction = 'dislike') AS dislikes,
                   c.dislikes_count,
                   c.created_at, c.updated_at,
                   u.name AS user_name, u.image AS user_image
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(COMMENT_PAGE_SIZE)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let next_cursor = if comments.len() as i64 == COMMENT_PAGE_SIZE {
            Some(cursor + 1)
        } else {
            None
        };

        Ok(CommentPage {
            comments,
            next_cursor,
        })
    }

    /// Create a new comment with empty reaction sets and zero counters
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        description: &str,
    ) -> Result<Comment> {
        let post_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        if !post_exists {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, post_id, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, post_id, description, likes_count, dislikes_count,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Replace a comment's text. Author-only; reactions and created_at
    /// stay untouched, updated_at moves.
    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
        description: &str,
    ) -> Result<Comment> {
        let comment = self
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can update only your comment".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET description = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, post_id, description, likes_count, dislikes_count,
                      created_at, updated_at
            "#,
        )
        .bind(comment_id)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a comment. Author-only, independent of post ownership;
    /// reaction rows follow via FK cascade.
    pub async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> Result<()> {
        let comment = self
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can delete only your comment".to_string(),
            ));
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Bulk-remove every comment on a post; the receiving end of the
    /// post-delete cascade. Returns the number of comments removed.
    pub async fn delete_comments_for_post(&self, post_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

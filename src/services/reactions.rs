/// Reaction toggler - like/dislike with mutual-exclusion semantics.
///
/// Per (comment, user) pair there are three states: neutral, liked,
/// disliked. A `like` event toggles liked<->neutral and flips disliked
/// straight to liked; `dislike` is the mirror. One `comment_reactions`
/// row per pair (unique key) is the membership record; the denormalized
/// counters on the comment move in the same transaction, so they can
/// never drift from the set cardinality.
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ReactionKind, ReactionState, ReactionStatus};

#[derive(Clone)]
pub struct ReactionService {
    pool: PgPool,
}

impl ReactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a like/dislike toggle and return the resulting state.
    ///
    /// The transaction first locks the comment row, which serializes
    /// concurrent toggles on the same comment (a double-click cannot
    /// corrupt the counters), then re-derives the caller's current
    /// membership from the reaction row rather than any assumed prior
    /// state.
    pub async fn toggle(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionState> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
                .bind(comment_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        let current: Option<ReactionKind> = sqlx::query_scalar(
            r#"
            SELECT reaction FROM comment_reactions
            WHERE comment_id = $1 AND user_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let status = match current {
            // neutral -> reacted: add membership, bump the counter
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO comment_reactions (comment_id, user_id, reaction)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(comment_id)
                .bind(user_id)
                .bind(kind)
                .execute(&mut *tx)
                .await?;

                Self::bump_counter(&mut tx, comment_id, kind, 1).await?;
                Self::status_for(kind)
            }
            // reacted -> neutral: the toggle undoes itself
            Some(existing) if existing == kind => {
                sqlx::query(
                    "DELETE FROM comment_reactions WHERE comment_id = $1 AND user_id = $2",
                )
                .bind(comment_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

                Self::bump_counter(&mut tx, comment_id, kind, -1).await?;
                ReactionStatus::Neutral
            }
            // crossed over: flip membership, move both counters
            Some(opposite) => {
                sqlx::query(
                    r#"
                    UPDATE comment_reactions
                    SET reaction = $3, created_at = NOW()
                    WHERE comment_id = $1 AND user_id = $2
                    "#,
                )
                .bind(comment_id)
                .bind(user_id)
                .bind(kind)
                .execute(&mut *tx)
                .await?;

                Self::bump_counter(&mut tx, comment_id, opposite, -1).await?;
                Self::bump_counter(&mut tx, comment_id, kind, 1).await?;
                Self::status_for(kind)
            }
        };

        let (likes_count, dislikes_count): (i64, i64) = sqlx::query_as(
            "SELECT likes_count, dislikes_count FROM comments WHERE id = $1",
        )
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReactionState {
            status,
            likes_count,
            dislikes_count,
        })
    }

    async fn bump_counter(
        tx: &mut Transaction<'_, Postgres>,
        comment_id: Uuid,
        kind: ReactionKind,
        delta: i64,
    ) -> Result<()> {
        // GREATEST keeps the counters non-negative even if membership and
        // counter were ever repaired out of band.
        let sql = match kind {
            ReactionKind::Like => {
                "UPDATE comments SET likes_count = GREATEST(likes_count + $2, 0) WHERE id = $1"
            }
            ReactionKind::Dislike => {
                "UPDATE comments SET dislikes_count = GREATEST(dislikes_count + $2, 0) WHERE id = $1"
            }
        };

        sqlx::query(sql)
            .bind(comment_id)
            .bind(delta)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    fn status_for(kind: ReactionKind) -> ReactionStatus {
        match kind {
            ReactionKind::Like => ReactionStatus::Liked,
            ReactionKind::Dislike => ReactionStatus::Disliked,
        }
    }
}

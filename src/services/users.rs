/// User service - registration, credential lookup, and the admin-only
/// user management screens' backend.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserListResponse};
use crate::services::auth;
use crate::services::posts::ITEMS_PER_PAGE;

const USER_COLUMNS: &str =
    "id, username, email, name, image, password_hash, is_admin, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Paged user listing with optional name search; the caller is
    /// excluded from their own listing.
    pub async fn get_users(
        &self,
        page: i64,
        search: Option<&str>,
        exclude_user: Uuid,
    ) -> Result<UserListResponse> {
        let page = page.max(1);

        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id <> $1
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(exclude_user)
            .bind(search)
            .bind(ITEMS_PER_PAGE)
            .bind(ITEMS_PER_PAGE * (page - 1))
            .fetch_all(&self.pool)
            .await?;

        let total_users: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE id <> $1
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(exclude_user)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserListResponse { users, total_users })
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Create a user with a hashed password. Uniqueness pre-checks on
    /// username, email and name each give a clean 409.
    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<User> {
        self.ensure_unique("username", &req.username, None).await?;
        self.ensure_unique("email", &req.email, None).await?;
        self.ensure_unique("name", &req.name, None).await?;

        let password_hash = auth::hash_password(&req.password)?;

        let query = format!(
            r#"
            INSERT INTO users (username, email, name, image, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(&req.username)
            .bind(&req.email)
            .bind(&req.name)
            .bind(&req.image)
            .bind(&password_hash)
            .bind(req.is_admin)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    /// Admin update. A missing or blank password leaves the stored hash
    /// unchanged.
    pub async fn update_user(&self, user_id: Uuid, req: &UpdateUserRequest) -> Result<User> {
        let existing = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.ensure_unique("name", &req.name, Some(user_id)).await?;
        if let Some(email) = &req.email {
            self.ensure_unique("email", email, Some(user_id)).await?;
        }

        let password_hash = match req.password.as_deref() {
            Some(password) if !password.trim().is_empty() => {
                Some(auth::hash_password(password)?)
            }
            _ => existing.password_hash,
        };

        let query = format!(
            r#"
            UPDATE users
            SET name = $2, email = COALESCE($3, email), image = $4,
                password_hash = $5, is_admin = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(&req.name)
            .bind(&req.email)
            .bind(&req.image)
            .bind(&password_hash)
            .bind(req.is_admin)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn ensure_unique(
        &self,
        column: &str,
        value: &str,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        // `column` is one of our own identifiers, never caller input.
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM users WHERE {column} = $1 AND ($2::uuid IS NULL OR id <> $2))"
        );

        let taken: bool = sqlx::query_scalar(&query)
            .bind(value)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await?;

        if taken {
            let label = match column {
                "username" => "Username",
                "email" => "Email",
                _ => "Name",
            };
            return Err(AppError::Conflict(format!("{label} already exists")));
        }

        Ok(())
    }
}

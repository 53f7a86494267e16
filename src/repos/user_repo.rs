/*
 * Responsibility
 * - "Users" テーブル向け SQLx 操作
 * - handler からは UserRepo trait 越しに使う (テストではメモリ実装に差し替え)
 * - email の一意制約違反は RepoError::Conflict として返す
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    // bcrypt hash, never the plain password
    pub password: String,
    pub name: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError>;

    async fn create(&self, user: NewUser) -> Result<UserRow, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password, name, "createdAt", "updatedAt"
            FROM "Users"
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, user: NewUser) -> Result<UserRow, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO "Users" (id, email, password, name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password, name, "createdAt", "updatedAt"
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }
}

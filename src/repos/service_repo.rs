/*
 * Responsibility
 * - "AppointmentServices" テーブル向け SQLx 操作
 * - 削除は論理削除 ("isRemove" = true)。削除済みの行は以降どの操作からも見えない
 * - 公開系 (list/find) は "isPublic" = true のみ
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    #[sqlx(rename = "showTime")]
    pub show_time: Option<i32>,
    pub order: i32,
    #[sqlx(rename = "isRemove")]
    pub is_remove: bool,
    #[sqlx(rename = "isPublic")]
    pub is_public: bool,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub show_time: Option<i32>,
    pub order: i32,
    pub is_public: bool,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub show_time: Option<i32>,
    pub order: Option<i32>,
    pub is_public: Option<bool>,
}

#[async_trait]
pub trait ServiceRepo: Send + Sync {
    /// Public, not removed. `order` ASC, then newest first.
    async fn list_public(&self) -> Result<Vec<ServiceRow>, RepoError>;

    async fn find_public(&self, id: Uuid) -> Result<Option<ServiceRow>, RepoError>;

    async fn create(&self, service: NewService) -> Result<ServiceRow, RepoError>;

    /// `None` when the row does not exist or is already removed.
    async fn update(&self, id: Uuid, patch: ServicePatch)
    -> Result<Option<ServiceRow>, RepoError>;

    /// `false` when the row does not exist or is already removed.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgServiceRepo {
    pool: PgPool,
}

impl PgServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepo for PgServiceRepo {
    async fn list_public(&self) -> Result<Vec<ServiceRow>, RepoError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT
                id, name, description, price, "showTime", "order",
                "isRemove", "isPublic", "createdAt", "updatedAt"
            FROM "AppointmentServices"
            WHERE "isPublic" = true AND "isRemove" = false
            ORDER BY "order" ASC, "createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_public(&self, id: Uuid) -> Result<Option<ServiceRow>, RepoError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT
                id, name, description, price, "showTime", "order",
                "isRemove", "isPublic", "createdAt", "updatedAt"
            FROM "AppointmentServices"
            WHERE id = $1 AND "isPublic" = true AND "isRemove" = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, service: NewService) -> Result<ServiceRow, RepoError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            INSERT INTO "AppointmentServices"
                (id, name, description, price, "showTime", "order", "isPublic")
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, name, description, price, "showTime", "order",
                "isRemove", "isPublic", "createdAt", "updatedAt"
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.show_time)
        .bind(service.order)
        .bind(service.is_public)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ServicePatch,
    ) -> Result<Option<ServiceRow>, RepoError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            UPDATE "AppointmentServices"
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                "showTime" = COALESCE($5, "showTime"),
                "order" = COALESCE($6, "order"),
                "isPublic" = COALESCE($7, "isPublic"),
                "updatedAt" = NOW()
            WHERE id = $1 AND "isRemove" = false
            RETURNING
                id, name, description, price, "showTime", "order",
                "isRemove", "isPublic", "createdAt", "updatedAt"
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.show_time)
        .bind(patch.order)
        .bind(patch.is_public)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE "AppointmentServices"
            SET "isRemove" = true, "updatedAt" = NOW()
            WHERE id = $1 AND "isRemove" = false
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

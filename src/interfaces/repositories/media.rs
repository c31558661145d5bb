use async_trait::async_trait;

use crate::{
    entities::media::{MediaItem, MediaKind, NewMediaItem},
    errors::AppError,
    repositories::sqlx_repo::SqlxMediaRepo,
};

const COLUMNS: &str = "id, public_id, url, title, description, category, created_at";

/// Metadata store for gallery items. Every call is a single statement, so a
/// failed write never leaves a partial row behind.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// Newest first.
    async fn list(&self, kind: MediaKind) -> Result<Vec<MediaItem>, AppError>;
    async fn find_by_id(&self, kind: MediaKind, id: i64) -> Result<Option<MediaItem>, AppError>;
    /// A duplicate `public_id` is reported as `AppError::Conflict`.
    async fn insert(&self, kind: MediaKind, item: &NewMediaItem) -> Result<MediaItem, AppError>;
    /// Returns whether a row was removed.
    async fn delete(&self, kind: MediaKind, id: i64) -> Result<bool, AppError>;
    async fn count(&self, kind: MediaKind) -> Result<i64, AppError>;
}

impl SqlxMediaRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxMediaRepo { pool }
    }
}

#[async_trait]
impl MediaRepository for SqlxMediaRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list(&self, kind: MediaKind) -> Result<Vec<MediaItem>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} ORDER BY created_at DESC, id DESC",
            kind.table()
        );

        let items = sqlx::query_as::<_, MediaItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn find_by_id(&self, kind: MediaKind, id: i64) -> Result<Option<MediaItem>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", kind.table());

        sqlx::query_as::<_, MediaItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn insert(&self, kind: MediaKind, item: &NewMediaItem) -> Result<MediaItem, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {} (public_id, url, title, description, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#,
            kind.table()
        );

        sqlx::query_as::<_, MediaItem>(&sql)
            .bind(&item.public_id)
            .bind(&item.url)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.category)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict(format!(
                    "A {} with public id {} already exists",
                    kind, item.public_id
                )),
                other => other,
            })
    }

    async fn delete(&self, kind: MediaKind, id: i64) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, kind: MediaKind) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

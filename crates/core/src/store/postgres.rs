use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use super::{ContentRepository, RepositoryError, Upserted};
use crate::content::validate::ValidationError;
use crate::content::{ContentData, ContentSection, Section, Status};

const COLUMNS: &str = "id, section, draft_data, published_data, status, created_at, updated_at";

/// PostgreSQL-backed repository over the `content_sections` table.
#[derive(Debug, Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_returning(
        &self,
        id: &str,
        assignments: &str,
        data: Option<ContentData>,
    ) -> Result<Option<ContentSection>, RepositoryError> {
        // Every caller's assignments reference $2.
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let sql = format!(
            "UPDATE content_sections SET {assignments}, updated_at = now() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(data.map(Json))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(content_from_row).transpose()
    }
}

fn content_from_row(row: &PgRow) -> Result<ContentSection, RepositoryError> {
    let id: Uuid = row.try_get("id")?;
    let section: String = row.try_get("section")?;
    let status: String = row.try_get("status")?;
    let Json(draft_data): Json<ContentData> = row.try_get("draft_data")?;
    let Json(published_data): Json<ContentData> = row.try_get("published_data")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let section: Section = section
        .parse()
        .map_err(|e: ValidationError| RepositoryError::Corrupt(e.to_string()))?;
    let status: Status = status
        .parse()
        .map_err(|e: ValidationError| RepositoryError::Corrupt(e.to_string()))?;

    Ok(ContentSection {
        id: Some(id.to_string()),
        section,
        draft_data,
        published_data,
        status: Some(status),
        created_at: Some(created_at),
        updated_at: Some(updated_at),
    })
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ContentSection>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM content_sections ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(content_from_row).collect()
    }

    async fn find_by_section(
        &self,
        section: Section,
    ) -> Result<Option<ContentSection>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM content_sections WHERE section = $1"
        ))
        .bind(section.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(content_from_row).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContentSection>, RepositoryError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM content_sections WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(content_from_row).transpose()
    }

    async fn upsert_draft(
        &self,
        section: Section,
        data: ContentData,
    ) -> Result<(ContentSection, Upserted), RepositoryError> {
        // xmax is zero only for rows inserted by this statement.
        let row = sqlx::query(&format!(
            "INSERT INTO content_sections (id, section, draft_data, status) \
             VALUES ($1, $2, $3, 'draft') \
             ON CONFLICT (section) DO UPDATE \
             SET draft_data = EXCLUDED.draft_data, status = 'draft', updated_at = now() \
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        ))
        .bind(Uuid::now_v7())
        .bind(section.as_str())
        .bind(Json(&data))
        .fetch_one(&self.pool)
        .await?;

        let inserted: bool = row.try_get("inserted")?;
        let outcome = if inserted {
            Upserted::Created
        } else {
            Upserted::Updated
        };
        Ok((content_from_row(&row)?, outcome))
    }

    async fn save_draft(
        &self,
        id: &str,
        data: ContentData,
    ) -> Result<Option<ContentSection>, RepositoryError> {
        self.update_returning(id, "draft_data = $2, status = 'draft'", Some(data))
            .await
    }

    async fn publish(
        &self,
        id: &str,
        data: Option<ContentData>,
    ) -> Result<Option<ContentSection>, RepositoryError> {
        // SET expressions see the pre-update row, so both columns take the
        // same value.
        self.update_returning(
            id,
            "draft_data = COALESCE($2::jsonb, draft_data), \
             published_data = COALESCE($2::jsonb, draft_data), \
             status = 'published'",
            data,
        )
        .await
    }

    async fn revert(&self, id: &str) -> Result<Option<ContentSection>, RepositoryError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let row = sqlx::query(&format!(
            "UPDATE content_sections SET draft_data = '{{}}'::jsonb, \
             status = CASE WHEN published_data = '{{}}'::jsonb THEN 'unpublished' ELSE 'published' END, \
             updated_at = now() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(content_from_row).transpose()
    }
}

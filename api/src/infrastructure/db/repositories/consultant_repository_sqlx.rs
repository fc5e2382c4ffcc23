use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::application::ports::consultant_repository::ConsultantRepository;
use crate::domain::consultants::application::{ApplicationDraft, ConsultantApplication};
use crate::domain::moderation::ReviewStatus;
use crate::infrastructure::db::PgPool;

const APPLICATION_COLUMNS: &str = "id, user_id, headline, expertise, years_experience, status, \
                                   review_note, reviewed_at, created_at";

pub struct SqlxConsultantRepository {
    pub pool: PgPool,
}

impl SqlxConsultantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_application(r: &PgRow) -> anyhow::Result<ConsultantApplication> {
    Ok(ConsultantApplication {
        id: r.get("id"),
        user_id: r.get("user_id"),
        headline: r.get("headline"),
        expertise: r.get("expertise"),
        years_experience: r.get("years_experience"),
        status: r.get::<String, _>("status").parse()?,
        review_note: r.get("review_note"),
        reviewed_at: r.get("reviewed_at"),
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl ConsultantRepository for SqlxConsultantRepository {
    async fn create(
        &self,
        user_id: Uuid,
        draft: &ApplicationDraft,
    ) -> anyhow::Result<ConsultantApplication> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO consultant_applications (user_id, headline, expertise, years_experience)
               VALUES ($1, $2, $3, $4)
               RETURNING {APPLICATION_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(&draft.headline)
        .bind(&draft.expertise)
        .bind(draft.years_experience)
        .fetch_one(&self.pool)
        .await?;
        map_application(&row)
    }

    async fn has_pending(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM consultant_applications WHERE user_id = $1 AND status = 'pending')",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ConsultantApplication>> {
        let rows = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM consultant_applications
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_application).collect()
    }

    async fn list(
        &self,
        status: Option<ReviewStatus>,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<ConsultantApplication>, i64)> {
        let status = status.map(|s| s.as_str());
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM consultant_applications WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        let rows = sqlx::query(&format!(
            r#"SELECT {APPLICATION_COLUMNS} FROM consultant_applications
               WHERE ($1::text IS NULL OR status = $1)
               ORDER BY created_at DESC LIMIT $2 OFFSET $3"#
        ))
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        let items = rows
            .iter()
            .map(map_application)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn review(
        &self,
        id: Uuid,
        to: ReviewStatus,
        note: Option<&str>,
    ) -> anyhow::Result<Option<ConsultantApplication>> {
        let row = sqlx::query(&format!(
            r#"UPDATE consultant_applications
               SET status = $2, review_note = $3, reviewed_at = now()
               WHERE id = $1 AND status = 'pending'
               RETURNING {APPLICATION_COLUMNS}"#
        ))
        .bind(id)
        .bind(to.as_str())
        .bind(note)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_application).transpose()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ConsultantApplication>> {
        let row = sqlx::query(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM consultant_applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_application).transpose()
    }
}

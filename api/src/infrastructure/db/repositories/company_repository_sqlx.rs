use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::company_repository::CompanyRepository;
use crate::domain::companies::company::{Company, CompanyDraft};
use crate::infrastructure::db::PgPool;

const COMPANY_COLUMNS: &str = "id, owner_id, name, description, industry, website, location, \
                               registration_number, created_at, updated_at";

pub struct SqlxCompanyRepository {
    pub pool: PgPool,
}

impl SqlxCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_company(r: &PgRow) -> Company {
    Company {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        name: r.get("name"),
        description: r.get("description"),
        industry: r.get("industry"),
        website: r.get("website"),
        location: r.get("location"),
        registration_number: r.get("registration_number"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl CompanyRepository for SqlxCompanyRepository {
    async fn create(&self, owner_id: Uuid, draft: &CompanyDraft) -> anyhow::Result<Company> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO companies
                 (owner_id, name, description, industry, website, location, registration_number)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {COMPANY_COLUMNS}"#
        ))
        .bind(owner_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.industry)
        .bind(&draft.website)
        .bind(&draft.location)
        .bind(&draft.registration_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_company(&row))
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Company>> {
        let rows = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies
             WHERE owner_id = $1 AND NOT is_deleted ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_company).collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Company>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1 AND NOT is_deleted"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_company))
    }

    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        draft: &CompanyDraft,
    ) -> anyhow::Result<Option<Company>> {
        let row = sqlx::query(&format!(
            r#"UPDATE companies SET
                 name = $3, description = $4, industry = $5, website = $6,
                 location = $7, registration_number = $8, updated_at = now()
               WHERE id = $1 AND owner_id = $2 AND NOT is_deleted
               RETURNING {COMPANY_COLUMNS}"#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.industry)
        .bind(&draft.website)
        .bind(&draft.location)
        .bind(&draft.registration_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_company))
    }

    async fn soft_delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query(
            r#"UPDATE companies SET is_deleted = TRUE, updated_at = now()
               WHERE id = $1 AND owner_id = $2 AND NOT is_deleted"#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;
        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        sqlx::query(
            "UPDATE listings SET is_deleted = TRUE, updated_at = now() WHERE company_id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(true)
    }
}

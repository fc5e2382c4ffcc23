use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::admin_repository::AdminRepository;
use crate::domain::users::user::Admin;
use crate::infrastructure::db::PgPool;

pub struct SqlxAdminRepository {
    pub pool: PgPool,
}

impl SqlxAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_admin(r: &PgRow) -> Admin {
    Admin {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl AdminRepository for SqlxAdminRepository {
    async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Admin> {
        let row = sqlx::query(
            r#"INSERT INTO admins (name, email, password_hash) VALUES ($1, $2, $3)
               RETURNING id, name, email, created_at"#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_admin(&row))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Admin>> {
        let row = sqlx::query("SELECT id, name, email, created_at FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_admin))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(Admin, String)>> {
        let row = sqlx::query(
            "SELECT id, name, email, created_at, password_hash FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| (map_admin(&r), r.get("password_hash"))))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Admin>> {
        let row = sqlx::query("SELECT id, name, email, created_at FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_admin))
    }
}

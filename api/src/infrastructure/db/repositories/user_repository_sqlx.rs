use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::application::ports::user_repository::{NewUser, UserFilter, UserRepository};
use crate::domain::users::user::{User, UserRole, UserStatus};
use crate::infrastructure::db::{PgPool, contains_pattern};

const USER_COLUMNS: &str = "id, name, email, phone, role, status, created_at, updated_at";

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_user(r: &PgRow) -> anyhow::Result<User> {
    Ok(User {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        phone: r.get("phone"),
        role: r.get::<String, _>("role").parse()?,
        status: r.get::<String, _>("status").parse()?,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

fn push_user_filter(qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>, filter: &UserFilter) {
    qb.push(" WHERE NOT is_deleted");
    if let Some(q) = filter.q.as_deref() {
        let pattern = contains_pattern(q);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR email ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role.as_str());
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (name, email, phone, password_hash) VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        map_user(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND NOT is_deleted"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND NOT is_deleted"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(User, String)>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1 AND NOT is_deleted"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(r) => Ok(Some((map_user(&r)?, r.get("password_hash")))),
            None => Ok(None),
        }
    }

    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        let hash = sqlx::query_scalar(
            "SELECT password_hash FROM users WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hash)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<Option<String>>,
    ) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"UPDATE users SET
                 name = COALESCE($2, name),
                 phone = CASE WHEN $3 THEN $4 ELSE phone END,
                 updated_at = now()
               WHERE id = $1 AND NOT is_deleted
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(name)
        .bind(phone.is_some())
        .bind(phone.flatten())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "UPDATE users SET status = $2, updated_at = now() WHERE id = $1 AND NOT is_deleted
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query(
            "UPDATE users SET is_deleted = TRUE, updated_at = now() WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        sqlx::query(
            "UPDATE companies SET is_deleted = TRUE, updated_at = now() WHERE owner_id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE listings SET is_deleted = TRUE, updated_at = now() WHERE owner_id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn search(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<User>, i64)> {
        let mut count = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_user_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = sqlx::QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_user_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = query.build().fetch_all(&self.pool).await?;
        let users = rows.iter().map(map_user).collect::<anyhow::Result<Vec<_>>>()?;
        Ok((users, total))
    }
}

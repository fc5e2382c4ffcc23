use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::password_reset_repository::{
    PasswordReset, PasswordResetRepository,
};
use crate::application::ports::pending_registration_repository::{
    PendingRegistration, PendingRegistrationRepository,
};
use crate::application::services::otp::OtpState;
use crate::infrastructure::db::PgPool;

pub struct SqlxPendingRegistrationRepository {
    pub pool: PgPool,
}

impl SqlxPendingRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PendingRegistrationRepository for SqlxPendingRegistrationRepository {
    async fn upsert(&self, pending: &PendingRegistration) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO pending_registrations
                 (email, name, phone, password_hash, otp_hash, otp_expires_at, attempts, last_sent_at)
               VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
               ON CONFLICT (email) DO UPDATE SET
                 name = EXCLUDED.name,
                 phone = EXCLUDED.phone,
                 password_hash = EXCLUDED.password_hash,
                 otp_hash = EXCLUDED.otp_hash,
                 otp_expires_at = EXCLUDED.otp_expires_at,
                 attempts = 0,
                 last_sent_at = EXCLUDED.last_sent_at"#,
        )
        .bind(&pending.email)
        .bind(&pending.name)
        .bind(&pending.phone)
        .bind(&pending.password_hash)
        .bind(&pending.otp.otp_hash)
        .bind(pending.otp.expires_at)
        .bind(pending.last_sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, email: &str) -> anyhow::Result<Option<PendingRegistration>> {
        let row = sqlx::query(
            r#"SELECT email, name, phone, password_hash, otp_hash, otp_expires_at, attempts, last_sent_at
               FROM pending_registrations WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| PendingRegistration {
            email: r.get("email"),
            name: r.get("name"),
            phone: r.get("phone"),
            password_hash: r.get("password_hash"),
            otp: OtpState {
                otp_hash: r.get("otp_hash"),
                expires_at: r.get("otp_expires_at"),
                attempts: r.get("attempts"),
            },
            last_sent_at: r.get("last_sent_at"),
        }))
    }

    async fn record_failed_attempt(&self, email: &str) -> anyhow::Result<i32> {
        let attempts: i32 = sqlx::query_scalar(
            "UPDATE pending_registrations SET attempts = attempts + 1 WHERE email = $1 RETURNING attempts",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(attempts)
    }

    async fn refresh_otp(
        &self,
        email: &str,
        otp_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
        sent_at: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE pending_registrations
               SET otp_hash = $2, otp_expires_at = $3, attempts = 0, last_sent_at = $4
               WHERE email = $1"#,
        )
        .bind(email)
        .bind(otp_hash)
        .bind(expires_at)
        .bind(sent_at)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, email: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM pending_registrations WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct SqlxPasswordResetRepository {
    pub pool: PgPool,
}

impl SqlxPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetRepository for SqlxPasswordResetRepository {
    async fn upsert(&self, reset: &PasswordReset) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO password_resets (user_id, otp_hash, expires_at, attempts)
               VALUES ($1, $2, $3, 0)
               ON CONFLICT (user_id) DO UPDATE SET
                 otp_hash = EXCLUDED.otp_hash,
                 expires_at = EXCLUDED.expires_at,
                 attempts = 0,
                 created_at = now()"#,
        )
        .bind(reset.user_id)
        .bind(&reset.otp.otp_hash)
        .bind(reset.otp.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: Uuid) -> anyhow::Result<Option<PasswordReset>> {
        let row = sqlx::query(
            "SELECT user_id, otp_hash, expires_at, attempts FROM password_resets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| PasswordReset {
            user_id: r.get("user_id"),
            otp: OtpState {
                otp_hash: r.get("otp_hash"),
                expires_at: r.get("expires_at"),
                attempts: r.get("attempts"),
            },
        }))
    }

    async fn record_failed_attempt(&self, user_id: Uuid) -> anyhow::Result<i32> {
        let attempts: i32 = sqlx::query_scalar(
            "UPDATE password_resets SET attempts = attempts + 1 WHERE user_id = $1 RETURNING attempts",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(attempts)
    }

    async fn delete(&self, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM password_resets WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

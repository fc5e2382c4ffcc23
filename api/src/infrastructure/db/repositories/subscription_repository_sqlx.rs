use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::domain::subscriptions::subscription::{Plan, PlanDraft, Subscription};
use crate::infrastructure::db::PgPool;

const PLAN_COLUMNS: &str =
    "id, name, description, price_cents, duration_days, max_listings, is_active, created_at";

pub struct SqlxSubscriptionRepository {
    pub pool: PgPool,
}

impl SqlxSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_plan(r: &PgRow) -> Plan {
    Plan {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        price_cents: r.get("price_cents"),
        duration_days: r.get("duration_days"),
        max_listings: r.get("max_listings"),
        is_active: r.get("is_active"),
        created_at: r.get("created_at"),
    }
}

fn map_subscription(r: &PgRow) -> anyhow::Result<Subscription> {
    Ok(Subscription {
        id: r.get("id"),
        user_id: r.get("user_id"),
        plan_id: r.get("plan_id"),
        starts_at: r.get("starts_at"),
        ends_at: r.get("ends_at"),
        status: r.get::<String, _>("status").parse()?,
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl SubscriptionRepository for SqlxSubscriptionRepository {
    async fn list_plans(&self, active_only: bool) -> anyhow::Result<Vec<Plan>> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM subscription_plans
             WHERE ($1 = FALSE OR is_active) ORDER BY price_cents, name"
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_plan).collect())
    }

    async fn get_plan(&self, id: Uuid) -> anyhow::Result<Option<Plan>> {
        let row = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM subscription_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_plan))
    }

    async fn find_plan_by_name(&self, name: &str) -> anyhow::Result<Option<Plan>> {
        let row = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM subscription_plans WHERE lower(name) = lower($1)"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_plan))
    }

    async fn create_plan(&self, draft: &PlanDraft) -> anyhow::Result<Plan> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO subscription_plans (name, description, price_cents, duration_days, max_listings)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {PLAN_COLUMNS}"#
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price_cents)
        .bind(draft.duration_days)
        .bind(draft.max_listings)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_plan(&row))
    }

    async fn update_plan(&self, id: Uuid, draft: &PlanDraft) -> anyhow::Result<Option<Plan>> {
        let row = sqlx::query(&format!(
            r#"UPDATE subscription_plans SET
                 name = $2, description = $3, price_cents = $4, duration_days = $5, max_listings = $6
               WHERE id = $1
               RETURNING {PLAN_COLUMNS}"#
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price_cents)
        .bind(draft.duration_days)
        .bind(draft.max_listings)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_plan))
    }

    async fn set_plan_active(&self, id: Uuid, active: bool) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE subscription_plans SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn active_subscription(
        &self,
        user_id: Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<Option<(Subscription, Plan)>> {
        let row = sqlx::query(
            r#"SELECT s.id, s.user_id, s.plan_id, s.starts_at, s.ends_at, s.status, s.created_at,
                      p.name, p.description, p.price_cents, p.duration_days, p.max_listings,
                      p.is_active, p.created_at AS plan_created_at
               FROM subscriptions s JOIN subscription_plans p ON p.id = s.plan_id
               WHERE s.user_id = $1 AND s.status = 'active' AND s.ends_at > $2
               ORDER BY s.created_at DESC
               LIMIT 1"#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        let Some(r) = row else {
            return Ok(None);
        };
        let sub = map_subscription(&r)?;
        let plan = Plan {
            id: sub.plan_id,
            name: r.get("name"),
            description: r.get("description"),
            price_cents: r.get("price_cents"),
            duration_days: r.get("duration_days"),
            max_listings: r.get("max_listings"),
            is_active: r.get("is_active"),
            created_at: r.get("plan_created_at"),
        };
        Ok(Some((sub, plan)))
    }

    async fn start_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        starts_at: chrono::DateTime<chrono::Utc>,
        ends_at: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<Subscription> {
        let mut tx = self.pool.begin().await?;
        // Serializes concurrent subscribes of one user ahead of the one-active index.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE subscriptions SET status = 'cancelled' WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        let row = sqlx::query(
            r#"INSERT INTO subscriptions (user_id, plan_id, starts_at, ends_at, status)
               VALUES ($1, $2, $3, $4, 'active')
               RETURNING id, user_id, plan_id, starts_at, ends_at, status, created_at"#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(&mut *tx)
        .await?;
        let sub = map_subscription(&row)?;
        tx.commit().await?;
        Ok(sub)
    }

    async fn cancel_active(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "UPDATE subscriptions SET status = 'cancelled' WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}

use async_trait::async_trait;
use sqlx::Row;

use crate::application::dto::stats::DashboardStats;
use crate::application::ports::stats_repository::StatsRepository;
use crate::infrastructure::db::PgPool;

pub struct SqlxStatsRepository {
    pub pool: PgPool,
}

impl SqlxStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for SqlxStatsRepository {
    async fn dashboard_stats(&self) -> anyhow::Result<DashboardStats> {
        let r = sqlx::query(
            r#"SELECT
                 (SELECT COUNT(*) FROM users WHERE NOT is_deleted) AS users,
                 (SELECT COUNT(*) FROM users WHERE NOT is_deleted AND status = 'blocked') AS blocked_users,
                 (SELECT COUNT(*) FROM users WHERE NOT is_deleted AND role = 'consultant') AS consultants,
                 (SELECT COUNT(*) FROM companies WHERE NOT is_deleted) AS companies,
                 (SELECT COUNT(*) FROM listings WHERE NOT is_deleted AND status = 'pending') AS listings_pending,
                 (SELECT COUNT(*) FROM listings WHERE NOT is_deleted AND status = 'approved') AS listings_approved,
                 (SELECT COUNT(*) FROM listings WHERE NOT is_deleted AND status = 'rejected') AS listings_rejected,
                 (SELECT COUNT(*) FROM consultant_applications WHERE status = 'pending') AS consultant_applications_pending,
                 (SELECT COUNT(*) FROM subscriptions WHERE status = 'active' AND ends_at > now()) AS active_subscriptions"#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(DashboardStats {
            users: r.get("users"),
            blocked_users: r.get("blocked_users"),
            consultants: r.get("consultants"),
            companies: r.get("companies"),
            listings_pending: r.get("listings_pending"),
            listings_approved: r.get("listings_approved"),
            listings_rejected: r.get("listings_rejected"),
            consultant_applications_pending: r.get("consultant_applications_pending"),
            active_subscriptions: r.get("active_subscriptions"),
        })
    }
}

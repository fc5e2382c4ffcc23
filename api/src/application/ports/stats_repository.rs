use async_trait::async_trait;

use crate::application::dto::stats::DashboardStats;

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn dashboard_stats(&self) -> anyhow::Result<DashboardStats>;
}

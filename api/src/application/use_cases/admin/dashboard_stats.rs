use crate::application::dto::stats::DashboardStats;
use crate::application::error::ServiceResult;
use crate::application::ports::stats_repository::StatsRepository;

pub struct GetDashboardStats<'a, R: StatsRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: StatsRepository + ?Sized> GetDashboardStats<'a, R> {
    pub async fn execute(&self) -> ServiceResult<DashboardStats> {
        Ok(self.repo.dashboard_stats().await?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub users: i64,
    pub blocked_users: i64,
    pub consultants: i64,
    pub companies: i64,
    pub listings_pending: i64,
    pub listings_approved: i64,
    pub listings_rejected: i64,
    pub consultant_applications_pending: i64,
    pub active_subscriptions: i64,
}

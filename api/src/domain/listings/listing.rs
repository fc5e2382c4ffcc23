use uuid::Uuid;

use crate::domain::moderation::ReviewStatus;

#[derive(Debug, Clone)]
pub struct Listing {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub asking_price_cents: Option<i64>,
    pub status: ReviewStatus,
    pub rejection_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ListingDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub asking_price_cents: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Clone)]
pub struct ListingInterest {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

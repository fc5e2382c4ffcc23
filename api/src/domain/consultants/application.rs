use uuid::Uuid;

use crate::domain::moderation::ReviewStatus;

#[derive(Debug, Clone)]
pub struct ConsultantApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub headline: String,
    pub expertise: String,
    pub years_experience: i32,
    pub status: ReviewStatus,
    pub review_note: Option<String>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationDraft {
    pub headline: String,
    pub expertise: String,
    pub years_experience: i32,
}

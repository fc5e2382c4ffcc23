use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::consultant_repository::ConsultantRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::validation;
use crate::domain::consultants::application::ConsultantApplication;
use crate::domain::moderation::ReviewStatus;
use crate::domain::users::user::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

pub struct ReviewApplication<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: ConsultantRepository + ?Sized,
{
    pub users: &'a U,
    pub applications: &'a C,
}

impl<'a, U, C> ReviewApplication<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: ConsultantRepository + ?Sized,
{
    pub async fn execute(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        note: Option<String>,
    ) -> ServiceResult<ConsultantApplication> {
        let note = validation::optional_text(note);
        let to = match decision {
            ReviewDecision::Approve => ReviewStatus::Approved,
            ReviewDecision::Reject => ReviewStatus::Rejected,
        };
        let Some(app) = self.applications.review(id, to, note.as_deref()).await? else {
            return match self.applications.get(id).await? {
                Some(current) => Err(ServiceError::conflict(format!(
                    "application is already {}",
                    current.status
                ))),
                None => Err(ServiceError::NotFound("application")),
            };
        };
        if to == ReviewStatus::Approved
            && !self.users.set_role(app.user_id, UserRole::Consultant).await?
        {
            tracing::warn!(application_id = %id, user_id = %app.user_id, "approved_applicant_missing");
        }
        tracing::info!(application_id = %id, status = to.as_str(), "consultant_application_reviewed");
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::consultants::application::ApplicationDraft;

    #[tokio::test]
    async fn approval_promotes_the_user() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "c@example.com", "abc12345").await;
        let app = ConsultantRepository::create(
            store.as_ref(),
            user.id,
            &ApplicationDraft {
                headline: "M&A advisor".into(),
                expertise: "Deals".into(),
                years_experience: 8,
            },
        )
        .await
        .unwrap();
        let uc = ReviewApplication {
            users: store.as_ref(),
            applications: store.as_ref(),
        };
        let reviewed = uc
            .execute(app.id, ReviewDecision::Approve, Some("welcome".into()))
            .await
            .unwrap();
        assert_eq!(reviewed.status, ReviewStatus::Approved);
        assert!(reviewed.reviewed_at.is_some());
        let user = UserRepository::find_by_id(store.as_ref(), user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, UserRole::Consultant);

        assert!(matches!(
            uc.execute(app.id, ReviewDecision::Reject, None).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            uc.execute(Uuid::new_v4(), ReviewDecision::Reject, None).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}

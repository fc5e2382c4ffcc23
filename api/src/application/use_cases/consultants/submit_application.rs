use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::consultant_repository::ConsultantRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::validation;
use crate::domain::consultants::application::{ApplicationDraft, ConsultantApplication};
use crate::domain::users::user::UserRole;

pub struct SubmitApplication<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: ConsultantRepository + ?Sized,
{
    pub users: &'a U,
    pub applications: &'a C,
}

impl<'a, U, C> SubmitApplication<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: ConsultantRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        draft: ApplicationDraft,
    ) -> ServiceResult<ConsultantApplication> {
        let draft = ApplicationDraft {
            headline: validation::required_text("headline", &draft.headline, 200)?,
            expertise: validation::required_text("expertise", &draft.expertise, 4000)?,
            years_experience: draft.years_experience,
        };
        if !(0..=80).contains(&draft.years_experience) {
            return Err(ServiceError::validation(
                "years_experience must be between 0 and 80",
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::Unauthorized)?;
        if user.role == UserRole::Consultant {
            return Err(ServiceError::conflict("you are already a consultant"));
        }
        if self.applications.has_pending(user_id).await? {
            return Err(ServiceError::conflict("an application is already pending review"));
        }
        let app = self.applications.create(user_id, &draft).await?;
        tracing::info!(application_id = %app.id, user_id = %user_id, "consultant_application_submitted");
        Ok(app)
    }
}

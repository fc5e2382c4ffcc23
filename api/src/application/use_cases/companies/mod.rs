use crate::application::error::ServiceResult;
use crate::application::services::validation;
use crate::domain::companies::company::CompanyDraft;

pub mod create_company;
pub mod delete_company;
pub mod get_company;
pub mod list_companies;
pub mod update_company;

/// Raw company fields as submitted by the client.
#[derive(Debug, Clone, Default)]
pub struct CompanyInput {
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub registration_number: Option<String>,
}

impl CompanyInput {
    pub(crate) fn into_draft(self) -> ServiceResult<CompanyDraft> {
        Ok(CompanyDraft {
            name: validation::required_text("name", &self.name, 200)?,
            description: validation::optional_text(self.description),
            industry: validation::optional_text(self.industry),
            website: validation::optional_url("website", self.website)?,
            location: validation::optional_text(self.location),
            registration_number: validation::optional_text(self.registration_number),
        })
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::domain::users::user::{User, UserRole, UserStatus};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub q: Option<String>,
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
}

/// Soft-deleted users are invisible to every lookup.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(User, String)>>;
    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>>;
    // phone: None => unchanged; Some(None) => cleared
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<Option<String>>,
    ) -> anyhow::Result<Option<User>>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool>;
    async fn set_status(&self, id: Uuid, status: UserStatus) -> anyhow::Result<Option<User>>;
    async fn set_role(&self, id: Uuid, role: UserRole) -> anyhow::Result<bool>;
    /// Also soft-deletes the user's companies and listings.
    async fn soft_delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn search(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<User>, i64)>;
}

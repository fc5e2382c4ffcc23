use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::user::Admin;

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Admin>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Admin>>;
    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(Admin, String)>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Admin>>;
}

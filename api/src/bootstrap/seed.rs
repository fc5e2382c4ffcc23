use crate::application::ports::admin_repository::AdminRepository;
use crate::application::services::passwords::hash_password;
use crate::bootstrap::config::Config;

/// Creates the bootstrap admin from `ADMIN_EMAIL` / `ADMIN_PASSWORD` unless it exists.
pub async fn seed_admin<R: AdminRepository + ?Sized>(cfg: &Config, repo: &R) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (cfg.admin_email.as_deref(), cfg.admin_password.as_deref())
    else {
        tracing::debug!("admin seed skipped: ADMIN_EMAIL/ADMIN_PASSWORD not set");
        return Ok(());
    };
    if repo.find_by_email(email).await?.is_some() {
        return Ok(());
    }
    if cfg.is_production && password.len() < 12 {
        anyhow::bail!("ADMIN_PASSWORD must be at least 12 characters in production");
    }
    let hash = hash_password(password)?;
    let admin = repo.create_admin("Administrator", email, &hash).await?;
    tracing::info!(admin_id = %admin.id, "admin_seeded");
    Ok(())
}

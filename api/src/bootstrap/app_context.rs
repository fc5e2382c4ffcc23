use std::sync::Arc;

use crate::application::ports::admin_repository::AdminRepository;
use crate::application::ports::company_repository::CompanyRepository;
use crate::application::ports::consultant_repository::ConsultantRepository;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::mail_sender::MailSender;
use crate::application::ports::password_reset_repository::PasswordResetRepository;
use crate::application::ports::pending_registration_repository::PendingRegistrationRepository;
use crate::application::ports::stats_repository::StatsRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::otp::OtpPolicy;
use crate::application::services::tokens::TokenIssuer;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::admin_repository_sqlx::SqlxAdminRepository;
use crate::infrastructure::db::repositories::company_repository_sqlx::SqlxCompanyRepository;
use crate::infrastructure::db::repositories::consultant_repository_sqlx::SqlxConsultantRepository;
use crate::infrastructure::db::repositories::document_repository_sqlx::SqlxDocumentRepository;
use crate::infrastructure::db::repositories::listing_repository_sqlx::SqlxListingRepository;
use crate::infrastructure::db::repositories::otp_repositories_sqlx::{
    SqlxPasswordResetRepository, SqlxPendingRegistrationRepository,
};
use crate::infrastructure::db::repositories::stats_repository_sqlx::SqlxStatsRepository;
use crate::infrastructure::db::repositories::subscription_repository_sqlx::SqlxSubscriptionRepository;
use crate::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use crate::infrastructure::mail::{LogMailSender, WebhookMailSender};
use crate::infrastructure::storage::FsStorage;

/// Shared handler state: config plus every port behind an `Arc<dyn _>`.
#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    tokens: TokenIssuer,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    pub user_repo: Arc<dyn UserRepository>,
    pub pending_repo: Arc<dyn PendingRegistrationRepository>,
    pub reset_repo: Arc<dyn PasswordResetRepository>,
    pub admin_repo: Arc<dyn AdminRepository>,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub listing_repo: Arc<dyn ListingRepository>,
    pub document_repo: Arc<dyn DocumentRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub consultant_repo: Arc<dyn ConsultantRepository>,
    pub stats_repo: Arc<dyn StatsRepository>,
    pub storage: Arc<dyn StoragePort>,
    pub mailer: Arc<dyn MailSender>,
}

impl AppServices {
    /// Postgres-backed repositories, disk storage and the configured mailer.
    pub fn from_pool(cfg: &Config, pool: PgPool) -> Self {
        let mailer: Arc<dyn MailSender> = match cfg.mail_webhook_url.as_deref() {
            Some(url) => Arc::new(WebhookMailSender::new(url, cfg.mail_from.clone())),
            None => {
                tracing::warn!("MAIL_WEBHOOK_URL not set; mail will only be logged");
                Arc::new(LogMailSender)
            }
        };
        Self {
            user_repo: Arc::new(SqlxUserRepository::new(pool.clone())),
            pending_repo: Arc::new(SqlxPendingRegistrationRepository::new(pool.clone())),
            reset_repo: Arc::new(SqlxPasswordResetRepository::new(pool.clone())),
            admin_repo: Arc::new(SqlxAdminRepository::new(pool.clone())),
            company_repo: Arc::new(SqlxCompanyRepository::new(pool.clone())),
            listing_repo: Arc::new(SqlxListingRepository::new(pool.clone())),
            document_repo: Arc::new(SqlxDocumentRepository::new(pool.clone())),
            subscription_repo: Arc::new(SqlxSubscriptionRepository::new(pool.clone())),
            consultant_repo: Arc::new(SqlxConsultantRepository::new(pool.clone())),
            stats_repo: Arc::new(SqlxStatsRepository::new(pool)),
            storage: Arc::new(FsStorage::new(cfg.uploads_dir.clone())),
            mailer,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            tokens: cfg.token_issuer(),
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn otp_policy(&self) -> OtpPolicy {
        self.cfg.otp_policy()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn pending_repo(&self) -> Arc<dyn PendingRegistrationRepository> {
        self.services.pending_repo.clone()
    }

    pub fn reset_repo(&self) -> Arc<dyn PasswordResetRepository> {
        self.services.reset_repo.clone()
    }

    pub fn admin_repo(&self) -> Arc<dyn AdminRepository> {
        self.services.admin_repo.clone()
    }

    pub fn company_repo(&self) -> Arc<dyn CompanyRepository> {
        self.services.company_repo.clone()
    }

    pub fn listing_repo(&self) -> Arc<dyn ListingRepository> {
        self.services.listing_repo.clone()
    }

    pub fn document_repo(&self) -> Arc<dyn DocumentRepository> {
        self.services.document_repo.clone()
    }

    pub fn subscription_repo(&self) -> Arc<dyn SubscriptionRepository> {
        self.services.subscription_repo.clone()
    }

    pub fn consultant_repo(&self) -> Arc<dyn ConsultantRepository> {
        self.services.consultant_repo.clone()
    }

    pub fn stats_repo(&self) -> Arc<dyn StatsRepository> {
        self.services.stats_repo.clone()
    }

    pub fn storage(&self) -> Arc<dyn StoragePort> {
        self.services.storage.clone()
    }

    pub fn mailer(&self) -> Arc<dyn MailSender> {
        self.services.mailer.clone()
    }
}

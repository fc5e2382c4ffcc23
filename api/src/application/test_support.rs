//! In-memory port implementations for use-case and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::application::dto::stats::DashboardStats;
use crate::application::ports::admin_repository::AdminRepository;
use crate::application::ports::company_repository::CompanyRepository;
use crate::application::ports::consultant_repository::ConsultantRepository;
use crate::application::ports::document_repository::{DocumentRepository, NewDocument};
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::mail_sender::{MailSender, OutgoingMail};
use crate::application::ports::password_reset_repository::{
    PasswordReset, PasswordResetRepository,
};
use crate::application::ports::pending_registration_repository::{
    PendingRegistration, PendingRegistrationRepository,
};
use crate::application::ports::stats_repository::StatsRepository;
use crate::application::ports::storage_port::{StoragePort, StoredFile};
use crate::application::ports::subscription_repository::SubscriptionRepository;
use crate::application::ports::user_repository::{NewUser, UserFilter, UserRepository};
use crate::application::services::otp::OtpPolicy;
use crate::application::services::passwords::hash_password;
use crate::application::services::tokens::TokenIssuer;
use crate::domain::companies::company::{Company, CompanyDraft};
use crate::domain::consultants::application::{ApplicationDraft, ConsultantApplication};
use crate::domain::documents::document::Document;
use crate::domain::listings::listing::{Listing, ListingDraft, ListingFilter, ListingInterest};
use crate::domain::moderation::ReviewStatus;
use crate::domain::subscriptions::subscription::{
    Plan, PlanDraft, Subscription, SubscriptionStatus,
};
use crate::domain::users::user::{Admin, User, UserRole, UserStatus};

struct UserRec {
    user: User,
    password_hash: String,
    deleted: bool,
}

#[derive(Default)]
struct State {
    users: Vec<UserRec>,
    pending: HashMap<String, PendingRegistration>,
    resets: HashMap<Uuid, PasswordReset>,
    admins: Vec<(Admin, String)>,
    companies: Vec<(Company, bool)>,
    listings: Vec<(Listing, bool)>,
    interests: Vec<ListingInterest>,
    documents: Vec<Document>,
    plans: Vec<Plan>,
    subscriptions: Vec<Subscription>,
    applications: Vec<ConsultantApplication>,
}

/// One store implementing every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

fn paginate<T: Clone>(items: Vec<T>, page: PageRequest) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let out = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    (out, total)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_pending_expiry(&self, email: &str, expires_at: chrono::DateTime<Utc>) {
        let mut st = self.state.lock().unwrap();
        if let Some(p) = st.pending.get_mut(email) {
            p.otp.expires_at = expires_at;
        }
    }

    pub fn set_pending_last_sent(&self, email: &str, sent_at: chrono::DateTime<Utc>) {
        let mut st = self.state.lock().unwrap();
        if let Some(p) = st.pending.get_mut(email) {
            p.last_sent_at = sent_at;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    pub fn reset_count(&self) -> usize {
        self.state.lock().unwrap().resets.len()
    }

    pub fn listing_is_deleted(&self, id: Uuid) -> bool {
        self.state
            .lock()
            .unwrap()
            .listings
            .iter()
            .any(|(l, deleted)| l.id == id && *deleted)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let mut st = self.state.lock().unwrap();
        if st
            .users
            .iter()
            .any(|r| !r.deleted && r.user.email == user.email)
        {
            anyhow::bail!("duplicate email");
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: UserRole::User,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        st.users.push(UserRec {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
            deleted: false,
        });
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter()
            .find(|r| !r.deleted && r.user.id == id)
            .map(|r| r.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(UserRepository::find_credentials(self, email)
            .await?
            .map(|(u, _)| u))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(User, String)>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter()
            .find(|r| !r.deleted && r.user.email == email)
            .map(|r| (r.user.clone(), r.password_hash.clone())))
    }

    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter()
            .find(|r| !r.deleted && r.user.id == id)
            .map(|r| r.password_hash.clone()))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<Option<String>>,
    ) -> anyhow::Result<Option<User>> {
        let mut st = self.state.lock().unwrap();
        let Some(rec) = st.users.iter_mut().find(|r| !r.deleted && r.user.id == id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            rec.user.name = name;
        }
        if let Some(phone) = phone {
            rec.user.phone = phone;
        }
        rec.user.updated_at = Utc::now();
        Ok(Some(rec.user.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        match st.users.iter_mut().find(|r| !r.deleted && r.user.id == id) {
            Some(rec) => {
                rec.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> anyhow::Result<Option<User>> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter_mut()
            .find(|r| !r.deleted && r.user.id == id)
            .map(|rec| {
                rec.user.status = status;
                rec.user.clone()
            }))
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .users
            .iter_mut()
            .find(|r| !r.deleted && r.user.id == id)
            .map(|rec| rec.user.role = role)
            .is_some())
    }

    async fn soft_delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let found = st
            .users
            .iter_mut()
            .find(|r| !r.deleted && r.user.id == id)
            .map(|rec| rec.deleted = true)
            .is_some();
        if found {
            for (c, deleted) in st.companies.iter_mut() {
                if c.owner_id == id {
                    *deleted = true;
                }
            }
            for (l, deleted) in st.listings.iter_mut() {
                if l.owner_id == id {
                    *deleted = true;
                }
            }
        }
        Ok(found)
    }

    async fn search(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<User>, i64)> {
        let st = self.state.lock().unwrap();
        let items: Vec<User> = st
            .users
            .iter()
            .rev()
            .filter(|r| !r.deleted)
            .map(|r| r.user.clone())
            .filter(|u| filter.status.is_none_or(|s| u.status == s))
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| {
                filter
                    .q
                    .as_deref()
                    .is_none_or(|q| contains_ci(&u.name, q) || contains_ci(&u.email, q))
            })
            .collect();
        Ok(paginate(items, page))
    }
}

#[async_trait]
impl PendingRegistrationRepository for InMemoryStore {
    async fn upsert(&self, pending: &PendingRegistration) -> anyhow::Result<()> {
        let mut st = self.state.lock().unwrap();
        st.pending.insert(pending.email.clone(), pending.clone());
        Ok(())
    }

    async fn find(&self, email: &str) -> anyhow::Result<Option<PendingRegistration>> {
        Ok(self.state.lock().unwrap().pending.get(email).cloned())
    }

    async fn record_failed_attempt(&self, email: &str) -> anyhow::Result<i32> {
        let mut st = self.state.lock().unwrap();
        let p = st
            .pending
            .get_mut(email)
            .ok_or_else(|| anyhow::anyhow!("no pending registration"))?;
        p.otp.attempts += 1;
        Ok(p.otp.attempts)
    }

    async fn refresh_otp(
        &self,
        email: &str,
        otp_hash: &str,
        expires_at: chrono::DateTime<Utc>,
        sent_at: chrono::DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .pending
            .get_mut(email)
            .map(|p| {
                p.otp.otp_hash = otp_hash.to_string();
                p.otp.expires_at = expires_at;
                p.otp.attempts = 0;
                p.last_sent_at = sent_at;
            })
            .is_some())
    }

    async fn delete(&self, email: &str) -> anyhow::Result<()> {
        self.state.lock().unwrap().pending.remove(email);
        Ok(())
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryStore {
    async fn upsert(&self, reset: &PasswordReset) -> anyhow::Result<()> {
        let mut st = self.state.lock().unwrap();
        st.resets.insert(reset.user_id, reset.clone());
        Ok(())
    }

    async fn find(&self, user_id: Uuid) -> anyhow::Result<Option<PasswordReset>> {
        Ok(self.state.lock().unwrap().resets.get(&user_id).cloned())
    }

    async fn record_failed_attempt(&self, user_id: Uuid) -> anyhow::Result<i32> {
        let mut st = self.state.lock().unwrap();
        let r = st
            .resets
            .get_mut(&user_id)
            .ok_or_else(|| anyhow::anyhow!("no reset"))?;
        r.otp.attempts += 1;
        Ok(r.otp.attempts)
    }

    async fn delete(&self, user_id: Uuid) -> anyhow::Result<()> {
        self.state.lock().unwrap().resets.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Admin> {
        let admin = Admin {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .unwrap()
            .admins
            .push((admin.clone(), password_hash.to_string()));
        Ok(admin)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Admin>> {
        Ok(AdminRepository::find_credentials(self, email)
            .await?
            .map(|(a, _)| a))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<(Admin, String)>> {
        let st = self.state.lock().unwrap();
        Ok(st.admins.iter().find(|(a, _)| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Admin>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .admins
            .iter()
            .find(|(a, _)| a.id == id)
            .map(|(a, _)| a.clone()))
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn create(&self, owner_id: Uuid, draft: &CompanyDraft) -> anyhow::Result<Company> {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            owner_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            industry: draft.industry.clone(),
            website: draft.website.clone(),
            location: draft.location.clone(),
            registration_number: draft.registration_number.clone(),
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .companies
            .push((company.clone(), false));
        Ok(company)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Company>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .companies
            .iter()
            .filter(|(c, deleted)| !deleted && c.owner_id == owner_id)
            .map(|(c, _)| c.clone())
            .collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Company>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .companies
            .iter()
            .find(|(c, deleted)| !deleted && c.id == id)
            .map(|(c, _)| c.clone()))
    }

    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        draft: &CompanyDraft,
    ) -> anyhow::Result<Option<Company>> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .companies
            .iter_mut()
            .find(|(c, deleted)| !deleted && c.id == id && c.owner_id == owner_id)
            .map(|(c, _)| {
                c.name = draft.name.clone();
                c.description = draft.description.clone();
                c.industry = draft.industry.clone();
                c.website = draft.website.clone();
                c.location = draft.location.clone();
                c.registration_number = draft.registration_number.clone();
                c.updated_at = Utc::now();
                c.clone()
            }))
    }

    async fn soft_delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let found = st
            .companies
            .iter_mut()
            .find(|(c, deleted)| !*deleted && c.id == id && c.owner_id == owner_id)
            .map(|(_, deleted)| *deleted = true)
            .is_some();
        if found {
            for (l, deleted) in st.listings.iter_mut() {
                if l.company_id == id {
                    *deleted = true;
                }
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn create(
        &self,
        owner_id: Uuid,
        company_id: Uuid,
        draft: &ListingDraft,
        limit: i64,
    ) -> anyhow::Result<Option<Listing>> {
        let mut st = self.state.lock().unwrap();
        let used = st
            .listings
            .iter()
            .filter(|(l, deleted)| !deleted && l.owner_id == owner_id)
            .count() as i64;
        if used >= limit {
            return Ok(None);
        }
        let company_name = st
            .companies
            .iter()
            .find(|(c, _)| c.id == company_id)
            .map(|(c, _)| c.name.clone())
            .unwrap_or_default();
        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            company_id,
            company_name,
            owner_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            location: draft.location.clone(),
            asking_price_cents: draft.asking_price_cents,
            status: ReviewStatus::Pending,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        st.listings.push((listing.clone(), false));
        Ok(Some(listing))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .listings
            .iter()
            .find(|(l, deleted)| !deleted && l.id == id)
            .map(|(l, _)| l.clone()))
    }

    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        draft: &ListingDraft,
    ) -> anyhow::Result<Option<Listing>> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .listings
            .iter_mut()
            .find(|(l, deleted)| !deleted && l.id == id && l.owner_id == owner_id)
            .map(|(l, _)| {
                l.title = draft.title.clone();
                l.description = draft.description.clone();
                l.category = draft.category.clone();
                l.location = draft.location.clone();
                l.asking_price_cents = draft.asking_price_cents;
                l.status = ReviewStatus::Pending;
                l.rejection_reason = None;
                l.updated_at = Utc::now();
                l.clone()
            }))
    }

    async fn soft_delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .listings
            .iter_mut()
            .find(|(l, deleted)| !*deleted && l.id == id && l.owner_id == owner_id)
            .map(|(_, deleted)| *deleted = true)
            .is_some())
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Listing>, i64)> {
        let st = self.state.lock().unwrap();
        let items: Vec<Listing> = st
            .listings
            .iter()
            .rev()
            .filter(|(_, deleted)| !deleted)
            .map(|(l, _)| l.clone())
            .filter(|l| filter.status.is_none_or(|s| l.status == s))
            .filter(|l| {
                filter.q.as_deref().is_none_or(|q| {
                    contains_ci(&l.title, q)
                        || l.description.as_deref().is_some_and(|d| contains_ci(d, q))
                })
            })
            .filter(|l| {
                filter.category.as_deref().is_none_or(|c| {
                    l.category
                        .as_deref()
                        .is_some_and(|lc| lc.eq_ignore_ascii_case(c))
                })
            })
            .filter(|l| {
                filter
                    .location
                    .as_deref()
                    .is_none_or(|loc| l.location.as_deref().is_some_and(|ll| contains_ci(ll, loc)))
            })
            .filter(|l| {
                filter
                    .min_price_cents
                    .is_none_or(|min| l.asking_price_cents.is_some_and(|p| p >= min))
            })
            .filter(|l| {
                filter
                    .max_price_cents
                    .is_none_or(|max| l.asking_price_cents.is_some_and(|p| p <= max))
            })
            .collect();
        Ok(paginate(items, page))
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Listing>, i64)> {
        let st = self.state.lock().unwrap();
        let items: Vec<Listing> = st
            .listings
            .iter()
            .rev()
            .filter(|(l, deleted)| !deleted && l.owner_id == owner_id)
            .map(|(l, _)| l.clone())
            .collect();
        Ok(paginate(items, page))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: ReviewStatus,
        to: ReviewStatus,
        reason: Option<&str>,
    ) -> anyhow::Result<Option<Listing>> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .listings
            .iter_mut()
            .find(|(l, deleted)| !deleted && l.id == id && l.status == from)
            .map(|(l, _)| {
                l.status = to;
                l.rejection_reason = reason.map(str::to_string);
                l.updated_at = Utc::now();
                l.clone()
            }))
    }

    async fn add_interest(
        &self,
        listing_id: Uuid,
        user_id: Uuid,
        message: Option<&str>,
    ) -> anyhow::Result<Option<ListingInterest>> {
        let mut st = self.state.lock().unwrap();
        if st
            .interests
            .iter()
            .any(|i| i.listing_id == listing_id && i.user_id == user_id)
        {
            return Ok(None);
        }
        let (user_name, user_email) = st
            .users
            .iter()
            .find(|r| r.user.id == user_id)
            .map(|r| (r.user.name.clone(), r.user.email.clone()))
            .unwrap_or_default();
        let interest = ListingInterest {
            id: Uuid::new_v4(),
            listing_id,
            user_id,
            user_name,
            user_email,
            message: message.map(str::to_string),
            created_at: Utc::now(),
        };
        st.interests.push(interest.clone());
        Ok(Some(interest))
    }

    async fn list_interests(&self, listing_id: Uuid) -> anyhow::Result<Vec<ListingInterest>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .interests
            .iter()
            .filter(|i| i.listing_id == listing_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn insert(&self, doc: &NewDocument) -> anyhow::Result<Document> {
        let created = Document {
            id: Uuid::new_v4(),
            owner_id: doc.owner_id,
            company_id: doc.company_id,
            listing_id: doc.listing_id,
            filename: doc.filename.clone(),
            content_type: doc.content_type.clone(),
            size: doc.size,
            storage_path: doc.storage_path.clone(),
            content_hash: doc.content_hash.clone(),
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().documents.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Document>> {
        let st = self.state.lock().unwrap();
        Ok(st.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        company_id: Option<Uuid>,
        listing_id: Option<Uuid>,
    ) -> anyhow::Result<Vec<Document>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .documents
            .iter()
            .filter(|d| d.owner_id == owner_id)
            .filter(|d| company_id.is_none_or(|c| d.company_id == Some(c)))
            .filter(|d| listing_id.is_none_or(|l| d.listing_id == Some(l)))
            .cloned()
            .collect())
    }

    async fn delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<Option<Document>> {
        let mut st = self.state.lock().unwrap();
        let pos = st
            .documents
            .iter()
            .position(|d| d.id == id && d.owner_id == owner_id);
        Ok(pos.map(|i| st.documents.remove(i)))
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn list_plans(&self, active_only: bool) -> anyhow::Result<Vec<Plan>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .plans
            .iter()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect())
    }

    async fn get_plan(&self, id: Uuid) -> anyhow::Result<Option<Plan>> {
        let st = self.state.lock().unwrap();
        Ok(st.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn find_plan_by_name(&self, name: &str) -> anyhow::Result<Option<Plan>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .plans
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn create_plan(&self, draft: &PlanDraft) -> anyhow::Result<Plan> {
        let plan = Plan {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price_cents: draft.price_cents,
            duration_days: draft.duration_days,
            max_listings: draft.max_listings,
            is_active: true,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().plans.push(plan.clone());
        Ok(plan)
    }

    async fn update_plan(&self, id: Uuid, draft: &PlanDraft) -> anyhow::Result<Option<Plan>> {
        let mut st = self.state.lock().unwrap();
        Ok(st.plans.iter_mut().find(|p| p.id == id).map(|p| {
            p.name = draft.name.clone();
            p.description = draft.description.clone();
            p.price_cents = draft.price_cents;
            p.duration_days = draft.duration_days;
            p.max_listings = draft.max_listings;
            p.clone()
        }))
    }

    async fn set_plan_active(&self, id: Uuid, active: bool) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .plans
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.is_active = active)
            .is_some())
    }

    async fn active_subscription(
        &self,
        user_id: Uuid,
        now: chrono::DateTime<Utc>,
    ) -> anyhow::Result<Option<(Subscription, Plan)>> {
        let st = self.state.lock().unwrap();
        let sub = st.subscriptions.iter().rev().find(|s| {
            s.user_id == user_id && s.status == SubscriptionStatus::Active && s.ends_at > now
        });
        Ok(sub.and_then(|s| {
            st.plans
                .iter()
                .find(|p| p.id == s.plan_id)
                .map(|p| (s.clone(), p.clone()))
        }))
    }

    async fn start_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        starts_at: chrono::DateTime<Utc>,
        ends_at: chrono::DateTime<Utc>,
    ) -> anyhow::Result<Subscription> {
        let mut st = self.state.lock().unwrap();
        for s in st.subscriptions.iter_mut() {
            if s.user_id == user_id && s.status == SubscriptionStatus::Active {
                s.status = SubscriptionStatus::Cancelled;
            }
        }
        let sub = Subscription {
            id: Uuid::new_v4(),
            user_id,
            plan_id,
            starts_at,
            ends_at,
            status: SubscriptionStatus::Active,
            created_at: Utc::now(),
        };
        st.subscriptions.push(sub.clone());
        Ok(sub)
    }

    async fn cancel_active(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let mut any = false;
        for s in st.subscriptions.iter_mut() {
            if s.user_id == user_id && s.status == SubscriptionStatus::Active {
                s.status = SubscriptionStatus::Cancelled;
                any = true;
            }
        }
        Ok(any)
    }
}

#[async_trait]
impl ConsultantRepository for InMemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        draft: &ApplicationDraft,
    ) -> anyhow::Result<ConsultantApplication> {
        let app = ConsultantApplication {
            id: Uuid::new_v4(),
            user_id,
            headline: draft.headline.clone(),
            expertise: draft.expertise.clone(),
            years_experience: draft.years_experience,
            status: ReviewStatus::Pending,
            review_note: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().applications.push(app.clone());
        Ok(app)
    }

    async fn has_pending(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let st = self.state.lock().unwrap();
        Ok(st
            .applications
            .iter()
            .any(|a| a.user_id == user_id && a.status == ReviewStatus::Pending))
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ConsultantApplication>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .applications
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        status: Option<ReviewStatus>,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<ConsultantApplication>, i64)> {
        let st = self.state.lock().unwrap();
        let items: Vec<ConsultantApplication> = st
            .applications
            .iter()
            .rev()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn review(
        &self,
        id: Uuid,
        to: ReviewStatus,
        note: Option<&str>,
    ) -> anyhow::Result<Option<ConsultantApplication>> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.status == ReviewStatus::Pending)
            .map(|a| {
                a.status = to;
                a.review_note = note.map(str::to_string);
                a.reviewed_at = Some(Utc::now());
                a.clone()
            }))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ConsultantApplication>> {
        let st = self.state.lock().unwrap();
        Ok(st.applications.iter().find(|a| a.id == id).cloned())
    }
}

#[async_trait]
impl StatsRepository for InMemoryStore {
    async fn dashboard_stats(&self) -> anyhow::Result<DashboardStats> {
        let st = self.state.lock().unwrap();
        let now = Utc::now();
        let users = st.users.iter().filter(|r| !r.deleted);
        let listings = || st.listings.iter().filter(|(_, d)| !d).map(|(l, _)| l);
        Ok(DashboardStats {
            users: users.clone().count() as i64,
            blocked_users: users
                .clone()
                .filter(|r| r.user.status == UserStatus::Blocked)
                .count() as i64,
            consultants: users
                .filter(|r| r.user.role == UserRole::Consultant)
                .count() as i64,
            companies: st.companies.iter().filter(|(_, d)| !d).count() as i64,
            listings_pending: listings()
                .filter(|l| l.status == ReviewStatus::Pending)
                .count() as i64,
            listings_approved: listings()
                .filter(|l| l.status == ReviewStatus::Approved)
                .count() as i64,
            listings_rejected: listings()
                .filter(|l| l.status == ReviewStatus::Rejected)
                .count() as i64,
            consultant_applications_pending: st
                .applications
                .iter()
                .filter(|a| a.status == ReviewStatus::Pending)
                .count() as i64,
            active_subscriptions: st
                .subscriptions
                .iter()
                .filter(|s| s.status == SubscriptionStatus::Active && s.ends_at > now)
                .count() as i64,
        })
    }
}

/// Captures outgoing mail instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// First 6-digit run in the most recent mail body.
    pub fn last_otp(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let text = &sent.last()?.text;
        let chars: Vec<char> = text.chars().collect();
        chars
            .windows(6)
            .find(|w| w.iter().all(|c| c.is_ascii_digit()))
            .map(|w| w.iter().collect())
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.files.lock().unwrap().contains_key(relative_path)
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn store(
        &self,
        owner_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredFile> {
        let filename = original_filename.unwrap_or("file.bin").to_string();
        let relative_path = format!("{}/{}_{}", owner_id, Uuid::new_v4(), filename);
        self.files
            .lock()
            .unwrap()
            .insert(relative_path.clone(), bytes.to_vec());
        Ok(StoredFile {
            filename,
            relative_path,
            size: bytes.len() as i64,
            content_hash: format!("{:x}", bytes.len()),
        })
    }

    async fn read(&self, relative_path: &str) -> anyhow::Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(relative_path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("not_found"))
    }

    async fn delete(&self, relative_path: &str) -> anyhow::Result<()> {
        self.files.lock().unwrap().remove(relative_path);
        Ok(())
    }
}

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new("test-secret-0123456789", 3600, 1800)
}

pub fn otp_policy() -> OtpPolicy {
    OtpPolicy::default()
}

pub async fn seed_user(store: &InMemoryStore, email: &str, password: &str) -> User {
    let hash = hash_password(password).unwrap();
    UserRepository::create_user(
        store,
        &NewUser {
            name: "Test User".into(),
            email: email.into(),
            phone: None,
            password_hash: hash,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_company(store: &InMemoryStore, owner_id: Uuid, name: &str) -> Company {
    CompanyRepository::create(
        store,
        owner_id,
        &CompanyDraft {
            name: name.into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

/// Inserts a pending listing with no plan limit applied.
pub async fn seed_listing(
    store: &InMemoryStore,
    owner_id: Uuid,
    company_id: Uuid,
    draft: ListingDraft,
) -> Listing {
    ListingRepository::create(store, owner_id, company_id, &draft, i64::MAX)
        .await
        .unwrap()
        .unwrap()
}

pub async fn seed_plan(store: &InMemoryStore, name: &str, max_listings: i32) -> Plan {
    store
        .create_plan(&PlanDraft {
            name: name.into(),
            description: None,
            price_cents: 4900,
            duration_days: 30,
            max_listings,
        })
        .await
        .unwrap()
}

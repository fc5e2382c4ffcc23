use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::dto::pagination::PageRequest;
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::{Listing, ListingDraft, ListingFilter, ListingInterest};
use crate::domain::moderation::ReviewStatus;
use crate::infrastructure::db::{PgPool, contains_pattern};

const LISTING_SELECT: &str = r#"SELECT l.id, l.company_id, c.name AS company_name, l.owner_id, l.title,
       l.description, l.category, l.location, l.asking_price_cents, l.status,
       l.rejection_reason, l.created_at, l.updated_at
  FROM listings l JOIN companies c ON c.id = l.company_id"#;

pub struct SqlxListingRepository {
    pub pool: PgPool,
}

impl SqlxListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        let row = sqlx::query(&format!("{LISTING_SELECT} WHERE l.id = $1 AND NOT l.is_deleted"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_listing).transpose()
    }
}

fn map_listing(r: &PgRow) -> anyhow::Result<Listing> {
    Ok(Listing {
        id: r.get("id"),
        company_id: r.get("company_id"),
        company_name: r.get("company_name"),
        owner_id: r.get("owner_id"),
        title: r.get("title"),
        description: r.get("description"),
        category: r.get("category"),
        location: r.get("location"),
        asking_price_cents: r.get("asking_price_cents"),
        status: r.get::<String, _>("status").parse()?,
        rejection_reason: r.get("rejection_reason"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

fn push_listing_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
    qb.push(" WHERE NOT l.is_deleted");
    if let Some(status) = filter.status {
        qb.push(" AND l.status = ").push_bind(status.as_str());
    }
    if let Some(q) = filter.q.as_deref() {
        let pattern = contains_pattern(q);
        qb.push(" AND (l.title ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR l.description ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
    if let Some(category) = filter.category.as_deref() {
        qb.push(" AND lower(l.category) = lower(")
            .push_bind(category.to_string())
            .push(")");
    }
    if let Some(location) = filter.location.as_deref() {
        qb.push(" AND l.location ILIKE ")
            .push_bind(contains_pattern(location))
            .push(r" ESCAPE '\'");
    }
    if let Some(min) = filter.min_price_cents {
        qb.push(" AND l.asking_price_cents >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price_cents {
        qb.push(" AND l.asking_price_cents <= ").push_bind(max);
    }
}

#[async_trait]
impl ListingRepository for SqlxListingRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        company_id: Uuid,
        draft: &ListingDraft,
        limit: i64,
    ) -> anyhow::Result<Option<Listing>> {
        let mut tx = self.pool.begin().await?;
        // Row lock on the owner serializes concurrent creates against the limit.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?;
        let used: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listings WHERE owner_id = $1 AND NOT is_deleted",
        )
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;
        if used >= limit {
            tx.rollback().await?;
            return Ok(None);
        }
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO listings
                 (company_id, owner_id, title, description, category, location, asking_price_cents)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(company_id)
        .bind(owner_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.location)
        .bind(draft.asking_price_cents)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        let listing = self
            .fetch(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("listing {id} vanished after insert"))?;
        Ok(Some(listing))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        self.fetch(id).await
    }

    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        draft: &ListingDraft,
    ) -> anyhow::Result<Option<Listing>> {
        let res = sqlx::query(
            r#"UPDATE listings SET
                 title = $3, description = $4, category = $5, location = $6,
                 asking_price_cents = $7, status = 'pending', rejection_reason = NULL,
                 updated_at = now()
               WHERE id = $1 AND owner_id = $2 AND NOT is_deleted"#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.location)
        .bind(draft.asking_price_cents)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(id).await
    }

    async fn soft_delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE listings SET is_deleted = TRUE, updated_at = now()
               WHERE id = $1 AND owner_id = $2 AND NOT is_deleted"#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Listing>, i64)> {
        let mut count =
            QueryBuilder::new("SELECT COUNT(*) FROM listings l JOIN companies c ON c.id = l.company_id");
        push_listing_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(LISTING_SELECT);
        push_listing_filter(&mut query, filter);
        query
            .push(" ORDER BY l.created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = query.build().fetch_all(&self.pool).await?;
        let items = rows
            .iter()
            .map(map_listing)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Listing>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listings WHERE owner_id = $1 AND NOT is_deleted",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        let rows = sqlx::query(&format!(
            "{LISTING_SELECT} WHERE l.owner_id = $1 AND NOT l.is_deleted
             ORDER BY l.created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        let items = rows
            .iter()
            .map(map_listing)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: ReviewStatus,
        to: ReviewStatus,
        reason: Option<&str>,
    ) -> anyhow::Result<Option<Listing>> {
        let res = sqlx::query(
            r#"UPDATE listings SET status = $3, rejection_reason = $4, updated_at = now()
               WHERE id = $1 AND status = $2 AND NOT is_deleted"#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(reason)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(id).await
    }

    async fn add_interest(
        &self,
        listing_id: Uuid,
        user_id: Uuid,
        message: Option<&str>,
    ) -> anyhow::Result<Option<ListingInterest>> {
        let row = sqlx::query(
            r#"WITH inserted AS (
                 INSERT INTO listing_interests (listing_id, user_id, message)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (listing_id, user_id) DO NOTHING
                 RETURNING id, listing_id, user_id, message, created_at
               )
               SELECT i.id, i.listing_id, i.user_id, i.message, i.created_at,
                      u.name AS user_name, u.email AS user_email
               FROM inserted i JOIN users u ON u.id = i.user_id"#,
        )
        .bind(listing_id)
        .bind(user_id)
        .bind(message)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_interest))
    }

    async fn list_interests(&self, listing_id: Uuid) -> anyhow::Result<Vec<ListingInterest>> {
        let rows = sqlx::query(
            r#"SELECT i.id, i.listing_id, i.user_id, i.message, i.created_at,
                      u.name AS user_name, u.email AS user_email
               FROM listing_interests i JOIN users u ON u.id = i.user_id
               WHERE i.listing_id = $1 AND NOT u.is_deleted
               ORDER BY i.created_at DESC"#,
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_interest).collect())
    }
}

fn map_interest(r: &PgRow) -> ListingInterest {
    ListingInterest {
        id: r.get("id"),
        listing_id: r.get("listing_id"),
        user_id: r.get("user_id"),
        user_name: r.get("user_name"),
        user_email: r.get("user_email"),
        message: r.get("message"),
        created_at: r.get("created_at"),
    }
}

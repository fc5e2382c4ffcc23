use serde::Serialize;
use utoipa::ToSchema;

use crate::application::dto::pagination::Page;
use crate::presentation::http::admin::ApplicationResponse;
use crate::presentation::http::auth::UserResponse;
use crate::presentation::http::listings::ListingResponse;

/// JSON shape of every paginated list.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    ListingPage = Paginated<ListingResponse>,
    UserPage = Paginated<UserResponse>,
    ApplicationPage = Paginated<ApplicationResponse>
)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn from_page<U: Into<T>>(page: Page<U>) -> Self {
        let page = page.map(Into::into);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}

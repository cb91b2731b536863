use serde::{Deserialize, Serialize};

use crate::db_types::UserNotification;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination parameters as they arrive from the query string. Pages are 1-based.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page: Some(page), limit: Some(limit) }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// The row offset for the page. Computed in `i64` so that query-string extremes cannot
    /// overflow; the product of two `u32` values always fits.
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.limit())
    }
}

/// One page of a user's notification feed, together with the counts the client needs to render
/// badges and pagers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPage {
    pub total: i64,
    pub unread_count: i64,
    pub total_pages: i64,
    pub current_page: u32,
    pub notifications: Vec<UserNotification>,
}

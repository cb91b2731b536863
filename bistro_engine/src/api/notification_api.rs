use std::fmt::Debug;

use log::*;

use crate::{
    api::objects::{NotificationPage, Pagination},
    db_types::{NewNotification, Notification},
    traits::NotificationManagement,
    NotificationApiError,
};

/// `NotificationApi` fronts the append-only notification log and the per-user read receipts.
pub struct NotificationApi<B> {
    db: B,
}

impl<B> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi")
    }
}

impl<B> NotificationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> NotificationApi<B>
where B: NotificationManagement
{
    pub async fn insert(&self, notification: NewNotification) -> Result<Notification, NotificationApiError> {
        let n = self.db.insert_notification(notification).await?;
        debug!("🔔️ Notification #{} recorded ({})", n.id, n.kind);
        Ok(n)
    }

    /// One page of the user's feed, newest first, with the counts clients use for badges and
    /// pagers.
    pub async fn page_for_user(
        &self,
        user_id: i64,
        pagination: &Pagination,
    ) -> Result<NotificationPage, NotificationApiError> {
        let total = self.db.count_for_user(user_id).await?;
        let unread_count = self.db.count_unread_for_user(user_id).await?;
        let notifications = self.db.notifications_for_user(user_id, pagination).await?;
        let limit = i64::from(pagination.limit());
        let total_pages = (total + limit - 1) / limit;
        Ok(NotificationPage { total, unread_count, total_pages, current_page: pagination.page(), notifications })
    }

    /// Records a read receipt. Idempotent.
    pub async fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<(), NotificationApiError> {
        self.db.mark_read(notification_id, user_id).await
    }

    /// Marks every visible notification as read for the user. Returns the number of receipts
    /// written.
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError> {
        let n = self.db.mark_all_read(user_id).await?;
        debug!("🔔️ Marked {n} notification(s) read for user #{user_id}");
        Ok(n)
    }
}

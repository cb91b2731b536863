use crate::{
    api::objects::Pagination,
    db_types::{NewNotification, Notification, UserNotification},
    NotificationApiError,
};

/// Behaviour for the append-only notification log.
///
/// A notification with no target rows is a broadcast and is visible to every user. Read state is
/// tracked per user as an append-only set of receipts; nothing is ever deleted.
#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, NotificationApiError>;
    /// The notifications visible to the user (targeted at them, or broadcast), newest first, with
    /// the read flag computed for that user.
    async fn notifications_for_user(
        &self,
        user_id: i64,
        pagination: &Pagination,
    ) -> Result<Vec<UserNotification>, NotificationApiError>;
    /// Total number of notifications visible to the user.
    async fn count_for_user(&self, user_id: i64) -> Result<i64, NotificationApiError>;
    /// Number of visible notifications the user has not read yet.
    async fn count_unread_for_user(&self, user_id: i64) -> Result<i64, NotificationApiError>;
    /// Records a read receipt. Idempotent; reading someone else's broadcast twice is not an error.
    async fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<(), NotificationApiError>;
    /// Records read receipts for every visible unread notification. Returns the number of receipts
    /// written.
    async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError>;
}

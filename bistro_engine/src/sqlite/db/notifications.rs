use log::trace;
use sqlx::{types::Json, SqliteConnection};

use crate::{
    api::objects::Pagination,
    db_types::{NewNotification, Notification, UserNotification},
    NotificationApiError,
};

// A notification is visible to a user when it is targeted at them, or when it has no targets at
// all (a broadcast).
const VISIBLE: &str = r#"
    (NOT EXISTS (SELECT 1 FROM notification_targets t WHERE t.notification_id = n.id)
     OR EXISTS (SELECT 1 FROM notification_targets t WHERE t.notification_id = n.id AND t.user_id = $1))
"#;

/// Inserts a notification and its target rows. Not atomic on its own; callers wrap it in a
/// transaction when the target list is non-empty.
pub async fn insert_notification(
    notification: NewNotification,
    conn: &mut SqliteConnection,
) -> Result<Notification, NotificationApiError> {
    let stored: Notification = sqlx::query_as(
        r#"
            INSERT INTO notifications (message, kind, metadata) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(notification.message)
    .bind(notification.kind)
    .bind(Json(notification.metadata))
    .fetch_one(&mut *conn)
    .await?;
    for user_id in &notification.targets {
        sqlx::query("INSERT INTO notification_targets (notification_id, user_id) VALUES ($1, $2)")
            .bind(stored.id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
    }
    trace!("🗃️ Notification #{} stored with {} target(s)", stored.id, notification.targets.len());
    Ok(stored)
}

/// One page of the notifications visible to the user, newest first, with the read flag computed
/// for that user.
pub async fn notifications_for_user(
    user_id: i64,
    pagination: &Pagination,
    conn: &mut SqliteConnection,
) -> Result<Vec<UserNotification>, sqlx::Error> {
    let q = format!(
        r#"
            SELECT n.id, n.message, n.kind, n.metadata, n.created_at,
                   EXISTS (SELECT 1 FROM notification_reads r WHERE r.notification_id = n.id AND r.user_id = $1)
                   AS read
            FROM notifications n
            WHERE {VISIBLE}
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT $2 OFFSET $3;
        "#
    );
    sqlx::query_as(&q)
        .bind(user_id)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset())
        .fetch_all(conn)
        .await
}

pub async fn count_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let q = format!("SELECT COUNT(*) FROM notifications n WHERE {VISIBLE}");
    sqlx::query_scalar(&q).bind(user_id).fetch_one(conn).await
}

pub async fn count_unread_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let q = format!(
        r#"
            SELECT COUNT(*) FROM notifications n
            WHERE {VISIBLE}
            AND NOT EXISTS (SELECT 1 FROM notification_reads r WHERE r.notification_id = n.id AND r.user_id = $1);
        "#
    );
    sqlx::query_scalar(&q).bind(user_id).fetch_one(conn).await
}

/// Records a read receipt. Idempotent. Fails with [`NotificationApiError::NotificationNotFound`]
/// when the notification does not exist.
pub async fn mark_read(
    notification_id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(), NotificationApiError> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM notifications WHERE id = $1")
        .bind(notification_id)
        .fetch_optional(&mut *conn)
        .await?;
    if exists.is_none() {
        return Err(NotificationApiError::NotificationNotFound);
    }
    sqlx::query("INSERT OR IGNORE INTO notification_reads (notification_id, user_id) VALUES ($1, $2)")
        .bind(notification_id)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Records read receipts for every visible unread notification. Returns the number of receipts
/// written.
pub async fn mark_all_read(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let q = format!(
        r#"
            INSERT OR IGNORE INTO notification_reads (notification_id, user_id)
            SELECT n.id, $1 FROM notifications n WHERE {VISIBLE};
        "#
    );
    let res = sqlx::query(&q).bind(user_id).execute(conn).await?;
    Ok(res.rows_affected())
}

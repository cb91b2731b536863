use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, ProfileUpdate, User},
    UserApiError,
};

/// Inserts a new user row. The email column carries a unique index; a violation maps to
/// [`UserApiError::EmailAlreadyRegistered`].
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, UserApiError> {
    let result = sqlx::query_as(
        r#"
            INSERT INTO users (name, email, password_hash, phone, address, security_answer_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.phone)
    .bind(user.address)
    .bind(user.security_answer_hash)
    .bind(user.role)
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(UserApiError::EmailAlreadyRegistered),
        Err(e) => Err(e.into()),
    }
}

pub async fn user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC").fetch_all(conn).await
}

/// Applies a partial profile update. `None` fields keep their current value. Fails with
/// [`UserApiError::UserNotFound`] when the id does not exist.
pub async fn update_profile(
    user_id: i64,
    update: ProfileUpdate,
    conn: &mut SqliteConnection,
) -> Result<User, UserApiError> {
    let user = sqlx::query_as(
        r#"
            UPDATE users SET
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(update.name)
    .bind(update.password_hash)
    .bind(update.phone)
    .bind(update.address)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Profile for user #{user_id} updated");
    Ok(user)
}

use thiserror::Error;

use crate::helpers::PasswordError;

#[derive(Debug, Clone, Error)]
pub enum UserApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("This email is already registered")]
    EmailAlreadyRegistered,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error(transparent)]
    PasswordHash(#[from] PasswordError),
}

impl From<sqlx::Error> for UserApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::UserNotFound,
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum MenuApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Food not found")]
    FoodNotFound,
    #[error("A food with the slug '{0}' already exists")]
    DuplicateSlug(String),
}

impl From<sqlx::Error> for MenuApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::FoodNotFound,
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order not found")]
    OrderNotFound,
    #[error("An order must contain at least one item")]
    EmptyOrder,
    #[error("{0} is not a valid order quantity")]
    InvalidQuantity(i64),
    #[error("Food #{0} is not on the menu")]
    UnknownFood(i64),
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::OrderNotFound,
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum NotificationApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Notification not found")]
    NotificationNotFound,
}

impl From<sqlx::Error> for NotificationApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotificationNotFound,
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

use std::{fmt::Display, str::FromStr};

use bb_common::Cents;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, Type};
pub use sqlx::types::Json;
use thiserror::Error;

//--------------------------------------        Role        ----------------------------------------------------------
/// Access roles known to the server. Every registered account holds `Customer`; staff accounts
/// additionally hold `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

pub type Roles = Vec<Role>;

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(pub String);

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

impl Role {
    /// The full role set granted at login for an account with this stored role.
    pub fn granted_roles(&self) -> Roles {
        match self {
            Role::Customer => vec![Role::Customer],
            Role::Admin => vec![Role::Customer, Role::Admin],
        }
    }
}

//--------------------------------------        User        ----------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub security_answer_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The projection of a user record that is safe to return to clients. Password and security-answer
/// hashes never leave the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub security_answer_hash: String,
    pub role: Role,
}

/// A partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

//--------------------------------------        Cart        ----------------------------------------------------------
/// A single cart entry as submitted by clients: which food, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub food_id: i64,
    pub quantity: i64,
}

/// A cart entry resolved against the menu at read time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartLine {
    pub food_id: i64,
    pub name: String,
    pub price: Cents,
    pub quantity: i64,
}

//--------------------------------------        Food        ----------------------------------------------------------
/// A menu item. The photo blob itself is deliberately excluded; it is fetched separately via
/// [`crate::traits::MenuManagement::fetch_photo`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Cents,
    pub category: String,
    pub quantity: i64,
    pub has_photo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Cents,
    pub category: String,
    pub quantity: i64,
    pub photo: Option<FoodPhoto>,
}

/// A partial menu item update. `None` fields are left untouched; a new photo replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Cents>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub photo: Option<FoodPhoto>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct FoodPhoto {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for FoodPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FoodPhoto({} bytes, {})", self.data.len(), self.mime_type)
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// The order lifecycle states. Any status may follow any other; the server does not enforce a
/// transition graph and admins can move orders freely, including back to `NotProcessed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been created and nobody has looked at it yet.
    NotProcessed,
    /// The kitchen is working on the order.
    Processing,
    /// The order has left the building.
    Shipped,
    /// The order has been delivered to the buyer.
    Delivered,
    /// The order has been cancelled by the buyer or an admin.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::NotProcessed => write!(f, "NotProcessed"),
            OrderStatusType::Processing => write!(f, "Processing"),
            OrderStatusType::Shipped => write!(f, "Shipped"),
            OrderStatusType::Delivered => write!(f, "Delivered"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotProcessed" => Ok(Self::NotProcessed),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Order       ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    /// The payment record captured at checkout. Opaque to the server; stored and returned as-is.
    pub payment: Json<Value>,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line resolved against the menu. The unit price is the price at the time the order was
/// placed, not the current menu price.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderLine {
    pub food_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Cents,
}

/// An order together with its resolved line items. This is the shape all order endpoints return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilledOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

impl FilledOrder {
    pub fn total(&self) -> Cents {
        self.items.iter().map(|i| i.unit_price * i.quantity).sum()
    }
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: i64,
    pub items: Vec<CartItem>,
    pub payment: Value,
}

//--------------------------------------    Notifications    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum NotificationKind {
    Order,
    Product,
    General,
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Order => write!(f, "order"),
            NotificationKind::Product => write!(f, "product"),
            NotificationKind::General => write!(f, "general"),
        }
    }
}

/// A new entry for the notification log. An empty target list means the notification is visible to
/// every user (a broadcast); otherwise it is visible only to the listed users.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub message: String,
    pub kind: NotificationKind,
    pub targets: Vec<i64>,
    pub metadata: Value,
}

impl NewNotification {
    pub fn broadcast(message: impl Into<String>, kind: NotificationKind, metadata: Value) -> Self {
        Self { message: message.into(), kind, targets: Vec::new(), metadata }
    }

    pub fn targeted(message: impl Into<String>, kind: NotificationKind, targets: Vec<i64>, metadata: Value) -> Self {
        Self { message: message.into(), kind, targets, metadata }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub kind: NotificationKind,
    pub metadata: Json<Value>,
    pub created_at: DateTime<Utc>,
}

/// A notification as seen by one user, with the read flag computed for that user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserNotification {
    pub id: i64,
    pub message: String,
    pub kind: NotificationKind,
    pub metadata: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

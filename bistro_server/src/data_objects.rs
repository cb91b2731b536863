use std::fmt::Display;

use bb_common::Cents;
use bistro_engine::db_types::{CartItem, CartLine, Food, OrderStatusType, PublicUser};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// A guest cart accumulated before logging in. Quantities of duplicate foods are summed into
    /// the account cart.
    #[serde(default)]
    pub cart: Option<Vec<CartItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub cart: Vec<CartLine>,
    pub wishlist: Vec<Food>,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdateRequest {
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistToggleRequest {
    pub food_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistResponse {
    pub added: bool,
    pub wishlist: Vec<Food>,
}

/// A new menu item. The photo travels as a base64 payload with its content type; prices are
/// integer cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFoodRequest {
    pub name: String,
    pub description: String,
    pub price: Cents,
    pub category: String,
    pub quantity: i64,
    #[serde(default)]
    pub photo: Option<PhotoPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFoodRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Cents>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub photo: Option<PhotoPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoPayload {
    /// Base64-encoded image bytes.
    pub data: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
    /// The payment record from the client. Stored verbatim and returned with the order.
    #[serde(default)]
    pub payment: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatusType,
}

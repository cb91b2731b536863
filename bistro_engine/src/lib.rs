//! Bistro Engine
//!
//! The Bistro Engine holds the domain logic for the food-ordering service: users and their carts
//! and wishlists, the menu, orders, and the notification log. It is storage-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@traits`] and [`mod@sqlite`]). SQLite is the only
//!    backend shipped today. You should never need to access the database directly; use the public
//!    API instead. The exception is the data types used in the database, which are defined in the
//!    `db_types` module and are public.
//! 2. The engine public API ([`mod@api`]). This provides the public-facing functionality of the
//!    engine: account management, menu management, the order flow, and notifications. Backends
//!    implement the traits in [`mod@traits`] in order to drive it.
//!
//! The engine also emits a set of events (order status changes, product creation and updates) that
//! can be subscribed to through a small hook system; see [`mod@events`].
pub mod api;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{MenuManagement, NotificationManagement, OrderManagement, UserManagement};
pub use api::{
    errors::{MenuApiError, NotificationApiError, OrderApiError, UserApiError},
    MenuApi,
    NotificationApi,
    OrderFlowApi,
    UserApi,
};

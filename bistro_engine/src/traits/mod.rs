//! # Database backend contracts.
//!
//! This module defines the interface contracts that storage backends implement in order to drive
//! the engine. Each trait covers one slice of the domain:
//!
//! * [`UserManagement`] — accounts, profiles, and the per-user cart and wishlist.
//! * [`MenuManagement`] — the food catalogue, including photo blobs and pagination.
//! * [`OrderManagement`] — order creation and the (unvalidated) status lifecycle.
//! * [`NotificationManagement`] — the append-only notification log and read receipts.
//!
//! The SQLite backend in [`crate::sqlite`] implements all four. Server tests mock them
//! individually.
mod menu_management;
mod notification_management;
mod order_management;
mod user_management;

pub use menu_management::MenuManagement;
pub use notification_management::NotificationManagement;
pub use order_management::OrderManagement;
pub use user_management::UserManagement;

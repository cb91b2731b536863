//! The engine public API.
//!
//! Thin, backend-generic wrappers over the [`crate::traits`] contracts. The order flow and menu
//! APIs also own the event producers, so that status changes and menu changes fan out to whatever
//! hooks the host application registered.
pub mod errors;
mod menu_api;
mod notification_api;
pub mod objects;
mod order_flow_api;
mod user_api;

pub use menu_api::MenuApi;
pub use notification_api::NotificationApi;
pub use order_flow_api::{OrderFlowApi, MAX_LINE_QUANTITY};
pub use user_api::{RegistrationRequest, UserApi};

//! # Bistro server
//! This module hosts the HTTP server for the Bistro food-ordering service. It is responsible for:
//! Authenticating users and issuing JWT access tokens.
//! Serving the menu, cart, wishlist, order and notification endpoints.
//! Pushing live events (order status changes, menu changes) to connected clients over SSE.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! All routes live under `/api`. See [routes](routes/index.html) for the full list. A `/health`
//! route returning a 200 OK response is exposed at the root.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod live;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;

//! Simple stateless pub-sub event layer
//!
//! Components of the system can subscribe to engine events (order status changes, menu changes)
//! and react to them, for example by writing a notification row or pushing a live update to
//! connected clients. Handlers are async and receive nothing but the event itself.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};

//! The live channel.
//!
//! Connected clients hold an open Server-Sent Events response and receive named events
//! (`order-status-updated`, `product-created`, `product-updated`) with JSON payloads as they
//! happen. The registry maps user ids to the open connections for that user; one user can have
//! several (multiple tabs, say).
//!
//! There is no replay and no delivery guarantee. A client that falls behind or disconnects is
//! pruned on the next failed send.
use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{Arc, Mutex},
    task::Poll,
};

use bytes::Bytes;
use futures::Stream;
use log::*;
use serde::Serialize;
use tokio::sync::mpsc;

pub const ORDER_STATUS_UPDATED: &str = "order-status-updated";
pub const PRODUCT_CREATED: &str = "product-created";
pub const PRODUCT_UPDATED: &str = "product-updated";

// Sends that would block drop the event instead; a stuck client loses frames, not the server.
const CLIENT_BUFFER_SIZE: usize = 32;

#[derive(Clone, Default)]
pub struct LiveBroadcaster {
    clients: Arc<Mutex<HashMap<i64, Vec<mpsc::Sender<Bytes>>>>>,
}

impl LiveBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection for the user and returns the body stream for the SSE response.
    pub fn register(&self, user_id: i64) -> impl Stream<Item = Result<Bytes, Infallible>> {
        let (tx, mut rx) = mpsc::channel::<Bytes>(CLIENT_BUFFER_SIZE);
        // An SSE comment frame confirms the connection to the client straight away.
        let _ = tx.try_send(Bytes::from_static(b": connected\n\n"));
        let mut clients = self.clients.lock().unwrap();
        clients.entry(user_id).or_default().push(tx);
        debug!("📡️ User #{user_id} connected to the live channel");
        futures::stream::poll_fn(move |cx| match rx.poll_recv(cx) {
            Poll::Ready(Some(frame)) => Poll::Ready(Some(Ok(frame))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        })
    }

    /// Emits a named event to every connected client.
    pub fn broadcast<T: Serialize>(&self, event: &str, payload: &T) {
        let frame = match sse_frame(event, payload) {
            Some(f) => f,
            None => return,
        };
        let mut clients = self.clients.lock().unwrap();
        let before: usize = clients.values().map(Vec::len).sum();
        clients.retain(|_, senders| {
            senders.retain(|tx| tx.try_send(frame.clone()).is_ok());
            !senders.is_empty()
        });
        let after: usize = clients.values().map(Vec::len).sum();
        if before > after {
            debug!("📡️ Pruned {} dead live connection(s)", before - after);
        }
        trace!("📡️ Broadcast {event} to {after} connection(s)");
    }

    /// Emits a named event to the connections of a single user.
    pub fn notify_user<T: Serialize>(&self, user_id: i64, event: &str, payload: &T) {
        let frame = match sse_frame(event, payload) {
            Some(f) => f,
            None => return,
        };
        let mut clients = self.clients.lock().unwrap();
        if let Some(senders) = clients.get_mut(&user_id) {
            senders.retain(|tx| tx.try_send(frame.clone()).is_ok());
            if senders.is_empty() {
                clients.remove(&user_id);
            }
        }
        trace!("📡️ Sent {event} to user #{user_id}");
    }

    pub fn connection_count(&self) -> usize {
        self.clients.lock().unwrap().values().map(Vec::len).sum()
    }
}

fn sse_frame<T: Serialize>(event: &str, payload: &T) -> Option<Bytes> {
    match serde_json::to_string(payload) {
        Ok(data) => Some(Bytes::from(format!("event: {event}\ndata: {data}\n\n"))),
        Err(e) => {
            error!("📡️ Could not serialize live event payload: {e}");
            None
        },
    }
}

use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{FilledOrder, NewOrder, OrderStatusType},
    events::{EventProducers, OrderStatusChangedEvent},
    traits::OrderManagement,
    OrderApiError,
};

/// `OrderFlowApi` is the primary API for placing orders and moving them through the status
/// lifecycle. Status changes fire an `OrderStatusChanged` event so the buyer can be notified.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

/// The largest quantity a single order line may carry. Keeps line totals comfortably inside `i64`
/// and catches fat-fingered or hostile payloads.
pub const MAX_LINE_QUANTITY: i64 = 1_000;

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Places a new order. Unit prices are captured from the menu inside the backend transaction,
    /// and the buyer's cart is cleared in the same transaction. Every line quantity must lie in
    /// `1..=MAX_LINE_QUANTITY`.
    pub async fn place_order(&self, order: NewOrder) -> Result<FilledOrder, OrderApiError> {
        if order.items.is_empty() {
            return Err(OrderApiError::EmptyOrder);
        }
        if let Some(item) = order.items.iter().find(|i| i.quantity < 1 || i.quantity > MAX_LINE_QUANTITY) {
            return Err(OrderApiError::InvalidQuantity(item.quantity));
        }
        let order = self.db.insert_order(order).await?;
        info!(
            "🛒️ Order #{} placed by user #{} for {} ({} line items)",
            order.order.id,
            order.order.buyer_id,
            order.total(),
            order.items.len()
        );
        Ok(order)
    }

    pub async fn order_by_id(&self, id: i64) -> Result<Option<FilledOrder>, OrderApiError> {
        self.db.fetch_order_by_id(id).await
    }

    /// The buyer's orders, newest first.
    pub async fn orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<FilledOrder>, OrderApiError> {
        self.db.orders_for_buyer(buyer_id).await
    }

    /// Every order on the system, newest first.
    pub async fn all_orders(&self) -> Result<Vec<FilledOrder>, OrderApiError> {
        self.db.fetch_all_orders().await
    }

    /// Sets the order's status. No transition validation happens here; admins can move orders
    /// freely. Fires an `OrderStatusChanged` event with the updated order.
    pub async fn update_status(&self, id: i64, status: OrderStatusType) -> Result<FilledOrder, OrderApiError> {
        let order = self.db.update_order_status(id, status).await?;
        info!("🛒️ Order #{} moved to {}", order.order.id, order.order.status);
        self.call_order_status_hook(&order).await;
        Ok(order)
    }

    async fn call_order_status_hook(&self, order: &FilledOrder) {
        for emitter in &self.producers.order_status_producers {
            debug!("🛒️📬️ Notifying order status hook subscribers");
            let event = OrderStatusChangedEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }
}

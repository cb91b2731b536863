use crate::{
    db_types::{FilledOrder, NewOrder, OrderStatusType},
    OrderApiError,
};

/// Behaviour for creating orders and moving them through the status lifecycle.
///
/// Status transitions are deliberately unvalidated: any status may follow any other. Admins use
/// this to correct mistakes as often as to advance an order.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores the order and its line items, capturing unit prices from the menu, and clears the
    /// buyer's cart. All of this happens in a single transaction.
    ///
    /// Fails with [`OrderApiError::EmptyOrder`] when the item list is empty and
    /// [`OrderApiError::UnknownFood`] when an item references a food that is not on the menu.
    async fn insert_order(&self, order: NewOrder) -> Result<FilledOrder, OrderApiError>;
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<FilledOrder>, OrderApiError>;
    /// The buyer's orders, newest first.
    async fn orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<FilledOrder>, OrderApiError>;
    /// Every order on the system, newest first.
    async fn fetch_all_orders(&self) -> Result<Vec<FilledOrder>, OrderApiError>;
    /// Sets the order's status and returns the updated order.
    async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<FilledOrder, OrderApiError>;
}

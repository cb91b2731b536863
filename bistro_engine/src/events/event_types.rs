use serde::{Deserialize, Serialize};

use crate::db_types::{FilledOrder, Food};

/// Fired after an admin changes an order's status. Subscribers receive the updated order with its
/// line items already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub order: FilledOrder,
}

impl OrderStatusChangedEvent {
    pub fn new(order: FilledOrder) -> Self {
        Self { order }
    }
}

/// Fired after a new food lands on the menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreatedEvent {
    pub food: Food,
}

impl ProductCreatedEvent {
    pub fn new(food: Food) -> Self {
        Self { food }
    }
}

/// Fired after an existing food is updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdatedEvent {
    pub food: Food,
}

impl ProductUpdatedEvent {
    pub fn new(food: Food) -> Self {
        Self { food }
    }
}

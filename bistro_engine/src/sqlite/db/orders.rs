use bb_common::Cents;
use log::debug;
use sqlx::{types::Json, SqliteConnection};

use super::cart;
use crate::{
    db_types::{FilledOrder, NewOrder, Order, OrderLine, OrderStatusType},
    OrderApiError,
};

/// Inserts the order and its line items, capturing unit prices from the menu, and clears the
/// buyer's cart. This is not atomic on its own; callers wrap it in a transaction and pass
/// `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<FilledOrder, OrderApiError> {
    if order.items.is_empty() {
        return Err(OrderApiError::EmptyOrder);
    }
    let stored: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (buyer_id, payment, status) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(order.buyer_id)
    .bind(Json(order.payment))
    .bind(OrderStatusType::NotProcessed)
    .fetch_one(&mut *conn)
    .await?;
    let mut items = Vec::with_capacity(order.items.len());
    for item in &order.items {
        let food: Option<(String, Cents)> =
            sqlx::query_as("SELECT name, price FROM foods WHERE id = $1").bind(item.food_id).fetch_optional(&mut *conn).await?;
        let (name, unit_price) = food.ok_or(OrderApiError::UnknownFood(item.food_id))?;
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, food_id, name, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5);
            "#,
        )
        .bind(stored.id)
        .bind(item.food_id)
        .bind(name.clone())
        .bind(item.quantity)
        .bind(unit_price)
        .execute(&mut *conn)
        .await?;
        items.push(OrderLine { food_id: item.food_id, name, quantity: item.quantity, unit_price });
    }
    cart::clear_cart(order.buyer_id, &mut *conn).await?;
    debug!("🗃️ Order #{} stored with {} line item(s)", stored.id, items.len());
    Ok(FilledOrder { order: stored, items })
}

pub async fn order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<FilledOrder>, sqlx::Error> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(&mut *conn).await?;
    match order {
        Some(order) => {
            let items = items_for_order(order.id, conn).await?;
            Ok(Some(FilledOrder { order, items }))
        },
        None => Ok(None),
    }
}

pub async fn items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderLine>, sqlx::Error> {
    sqlx::query_as("SELECT food_id, name, quantity, unit_price FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

pub async fn orders_for_buyer(buyer_id: i64, conn: &mut SqliteConnection) -> Result<Vec<FilledOrder>, sqlx::Error> {
    let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC")
        .bind(buyer_id)
        .fetch_all(&mut *conn)
        .await?;
    fill_orders(orders, conn).await
}

pub async fn all_orders(conn: &mut SqliteConnection) -> Result<Vec<FilledOrder>, sqlx::Error> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC").fetch_all(&mut *conn).await?;
    fill_orders(orders, conn).await
}

async fn fill_orders(orders: Vec<Order>, conn: &mut SqliteConnection) -> Result<Vec<FilledOrder>, sqlx::Error> {
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        let items = items_for_order(order.id, &mut *conn).await?;
        result.push(FilledOrder { order, items });
    }
    Ok(result)
}

/// Sets the order's status. Fails with [`OrderApiError::OrderNotFound`] when the id does not
/// exist.
pub async fn update_status(
    id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<FilledOrder, OrderApiError> {
    let order: Order = sqlx::query_as(
        "UPDATE orders SET status = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(&mut *conn)
    .await?;
    let items = items_for_order(order.id, conn).await?;
    Ok(FilledOrder { order, items })
}

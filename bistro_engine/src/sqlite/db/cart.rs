use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{CartItem, CartLine};

/// The user's cart, resolved against the menu. If a food was deleted after landing in a cart, its
/// row disappears from the result.
pub async fn cart_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartLine>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT c.food_id, f.name, f.price, c.quantity
            FROM cart_items c JOIN foods f ON f.id = c.food_id
            WHERE c.user_id = $1
            ORDER BY f.name;
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}

/// Replaces the user's cart wholesale. Entries referencing unknown foods are dropped silently,
/// and a payload listing the same food more than once has its quantities summed.
pub async fn replace_cart(
    user_id: i64,
    items: &[CartItem],
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    clear_cart(user_id, &mut *conn).await?;
    merge_cart(user_id, items, conn).await
}

/// Merges items into the user's cart, summing quantities for foods already present. Entries
/// referencing unknown foods are dropped silently.
pub async fn merge_cart(user_id: i64, items: &[CartItem], conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for item in items {
        if item.quantity <= 0 {
            continue;
        }
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM foods WHERE id = $1").bind(item.food_id).fetch_optional(&mut *conn).await?;
        if exists.is_none() {
            trace!("🗃️ Dropped cart entry for unknown food #{}", item.food_id);
            continue;
        }
        sqlx::query(
            r#"
                INSERT INTO cart_items (user_id, food_id, quantity) VALUES ($1, $2, $3)
                ON CONFLICT (user_id, food_id) DO UPDATE SET quantity = quantity + excluded.quantity;
            "#,
        )
        .bind(user_id)
        .bind(item.food_id)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn clear_cart(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    Ok(res.rows_affected())
}

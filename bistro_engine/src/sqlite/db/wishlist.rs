use sqlx::SqliteConnection;

use crate::db_types::Food;

/// Adds the food to the wishlist if absent, removes it if present. Returns `true` when the food
/// was added. Toggling an unknown food is a no-op that reports `false`.
pub async fn toggle(user_id: i64, food_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND food_id = $2")
        .bind(user_id)
        .bind(food_id)
        .execute(&mut *conn)
        .await?;
    if removed.rows_affected() > 0 {
        return Ok(false);
    }
    let added = sqlx::query(
        r#"
            INSERT OR IGNORE INTO wishlist_items (user_id, food_id)
            SELECT $1, id FROM foods WHERE id = $2;
        "#,
    )
    .bind(user_id)
    .bind(food_id)
    .execute(conn)
    .await?;
    Ok(added.rows_affected() > 0)
}

pub async fn wishlist_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Food>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT f.id, f.name, f.slug, f.description, f.price, f.category, f.quantity,
                   f.photo IS NOT NULL AS has_photo, f.created_at, f.updated_at
            FROM wishlist_items w JOIN foods f ON f.id = w.food_id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC;
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}

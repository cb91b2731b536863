use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Food, FoodPhoto, FoodUpdate, NewFood},
    MenuApiError,
};

// The photo blob stays out of the standard projection. It is only ever fetched on its own.
const FOOD_COLUMNS: &str =
    "id, name, slug, description, price, category, quantity, photo IS NOT NULL AS has_photo, created_at, updated_at";

/// Inserts a new food. The slug column carries a unique index; a violation maps to
/// [`MenuApiError::DuplicateSlug`].
pub async fn insert_food(food: NewFood, conn: &mut SqliteConnection) -> Result<Food, MenuApiError> {
    let (photo, mime_type) = match food.photo {
        Some(p) => (Some(p.data), Some(p.mime_type)),
        None => (None, None),
    };
    let q = format!(
        r#"
            INSERT INTO foods (name, slug, description, price, category, quantity, photo, photo_mime_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FOOD_COLUMNS};
        "#
    );
    let result = sqlx::query_as(&q)
        .bind(food.name)
        .bind(food.slug.clone())
        .bind(food.description)
        .bind(food.price)
        .bind(food.category)
        .bind(food.quantity)
        .bind(photo)
        .bind(mime_type)
        .fetch_one(conn)
        .await;
    match result {
        Ok(food) => Ok(food),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(MenuApiError::DuplicateSlug(food.slug)),
        Err(e) => Err(e.into()),
    }
}

/// Applies a partial update. `None` fields keep their current value; a new photo replaces the old
/// one. Fails with [`MenuApiError::FoodNotFound`] when the id does not exist.
pub async fn update_food(id: i64, update: FoodUpdate, conn: &mut SqliteConnection) -> Result<Food, MenuApiError> {
    let (photo, mime_type) = match update.photo {
        Some(p) => (Some(p.data), Some(p.mime_type)),
        None => (None, None),
    };
    let slug = update.slug.clone();
    let q = format!(
        r#"
            UPDATE foods SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                category = COALESCE($6, category),
                quantity = COALESCE($7, quantity),
                photo = COALESCE($8, photo),
                photo_mime_type = COALESCE($9, photo_mime_type),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {FOOD_COLUMNS};
        "#
    );
    let result = sqlx::query_as(&q)
        .bind(id)
        .bind(update.name)
        .bind(update.slug)
        .bind(update.description)
        .bind(update.price)
        .bind(update.category)
        .bind(update.quantity)
        .bind(photo)
        .bind(mime_type)
        .fetch_one(conn)
        .await;
    match result {
        Ok(food) => Ok(food),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(MenuApiError::DuplicateSlug(slug.unwrap_or_default()))
        },
        Err(e) => Err(e.into()),
    }
}

/// Deletes the food. Cart and wishlist rows referencing it go with it (ON DELETE CASCADE).
pub async fn delete_food(id: i64, conn: &mut SqliteConnection) -> Result<(), MenuApiError> {
    let res = sqlx::query("DELETE FROM foods WHERE id = $1").bind(id).execute(conn).await?;
    if res.rows_affected() == 0 {
        return Err(MenuApiError::FoodNotFound);
    }
    debug!("🗃️ Food #{id} deleted");
    Ok(())
}

pub async fn fetch_menu(conn: &mut SqliteConnection) -> Result<Vec<Food>, sqlx::Error> {
    let q = format!("SELECT {FOOD_COLUMNS} FROM foods ORDER BY created_at DESC");
    sqlx::query_as(&q).fetch_all(conn).await
}

pub async fn food_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Food>, sqlx::Error> {
    let q = format!("SELECT {FOOD_COLUMNS} FROM foods WHERE id = $1");
    sqlx::query_as(&q).bind(id).fetch_optional(conn).await
}

pub async fn food_by_slug(slug: &str, conn: &mut SqliteConnection) -> Result<Option<Food>, sqlx::Error> {
    let q = format!("SELECT {FOOD_COLUMNS} FROM foods WHERE slug = $1");
    sqlx::query_as(&q).bind(slug).fetch_optional(conn).await
}

pub async fn fetch_photo(id: i64, conn: &mut SqliteConnection) -> Result<Option<FoodPhoto>, sqlx::Error> {
    let row: Option<(Option<Vec<u8>>, Option<String>)> =
        sqlx::query_as("SELECT photo, photo_mime_type FROM foods WHERE id = $1").bind(id).fetch_optional(conn).await?;
    let photo = match row {
        Some((Some(data), Some(mime_type))) => Some(FoodPhoto { data, mime_type }),
        _ => None,
    };
    Ok(photo)
}

pub async fn count_foods(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM foods").fetch_one(conn).await
}

/// One page of the menu, newest first. `page` is 1-based.
pub async fn food_page(page: u32, page_size: u32, conn: &mut SqliteConnection) -> Result<Vec<Food>, sqlx::Error> {
    let page = page.max(1);
    let offset = i64::from(page - 1) * i64::from(page_size);
    let q = format!("SELECT {FOOD_COLUMNS} FROM foods ORDER BY created_at DESC LIMIT $1 OFFSET $2");
    sqlx::query_as(&q).bind(i64::from(page_size)).bind(offset).fetch_all(conn).await
}

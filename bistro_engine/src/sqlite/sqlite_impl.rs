//! `SqliteDatabase` is a concrete implementation of an ordering engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{cart, menu, new_pool, notifications, orders, users, wishlist};
use crate::{
    api::objects::Pagination,
    db_types::{
        CartItem,
        CartLine,
        FilledOrder,
        Food,
        FoodPhoto,
        FoodUpdate,
        NewFood,
        NewNotification,
        NewOrder,
        NewUser,
        Notification,
        OrderStatusType,
        ProfileUpdate,
        User,
        UserNotification,
    },
    traits::{MenuManagement, NotificationManagement, OrderManagement, UserManagement},
    MenuApiError,
    NotificationApiError,
    OrderApiError,
    UserApiError,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool for the given URL and returns a new instance of `SqliteDatabase`.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl UserManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::user_by_id(id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::user_by_email(email, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_all_users(&self) -> Result<Vec<User>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let users = users::all_users(&mut conn).await?;
        Ok(users)
    }

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<User, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_profile(user_id, update, &mut conn).await
    }

    async fn cart_for_user(&self, user_id: i64) -> Result<Vec<CartLine>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let cart = cart::cart_for_user(user_id, &mut conn).await?;
        Ok(cart)
    }

    async fn replace_cart(&self, user_id: i64, items: &[CartItem]) -> Result<Vec<CartLine>, UserApiError> {
        let mut tx = self.pool.begin().await?;
        cart::replace_cart(user_id, items, &mut tx).await?;
        let cart = cart::cart_for_user(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn merge_cart(&self, user_id: i64, items: &[CartItem]) -> Result<Vec<CartLine>, UserApiError> {
        let mut tx = self.pool.begin().await?;
        cart::merge_cart(user_id, items, &mut tx).await?;
        let cart = cart::cart_for_user(user_id, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn toggle_wishlist(&self, user_id: i64, food_id: i64) -> Result<bool, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let added = wishlist::toggle(user_id, food_id, &mut conn).await?;
        Ok(added)
    }

    async fn wishlist_for_user(&self, user_id: i64) -> Result<Vec<Food>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        let wishlist = wishlist::wishlist_for_user(user_id, &mut conn).await?;
        Ok(wishlist)
    }
}

impl MenuManagement for SqliteDatabase {
    async fn create_food(&self, food: NewFood) -> Result<Food, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::insert_food(food, &mut conn).await
    }

    async fn update_food(&self, id: i64, update: FoodUpdate) -> Result<Food, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::update_food(id, update, &mut conn).await
    }

    async fn delete_food(&self, id: i64) -> Result<(), MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::delete_food(id, &mut conn).await
    }

    async fn fetch_menu(&self) -> Result<Vec<Food>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        let menu = menu::fetch_menu(&mut conn).await?;
        Ok(menu)
    }

    async fn fetch_food_by_id(&self, id: i64) -> Result<Option<Food>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        let food = menu::food_by_id(id, &mut conn).await?;
        Ok(food)
    }

    async fn fetch_food_by_slug(&self, slug: &str) -> Result<Option<Food>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        let food = menu::food_by_slug(slug, &mut conn).await?;
        Ok(food)
    }

    async fn fetch_photo(&self, id: i64) -> Result<Option<FoodPhoto>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        let photo = menu::fetch_photo(id, &mut conn).await?;
        Ok(photo)
    }

    async fn count_foods(&self) -> Result<i64, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        let count = menu::count_foods(&mut conn).await?;
        Ok(count)
    }

    async fn fetch_food_page(&self, page: u32, page_size: u32) -> Result<Vec<Food>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        let foods = menu::food_page(page, page_size, &mut conn).await?;
        Ok(foods)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<FilledOrder, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<FilledOrder>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::order_by_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<FilledOrder>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::orders_for_buyer(buyer_id, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_all_orders(&self) -> Result<Vec<FilledOrder>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::all_orders(&mut conn).await?;
        Ok(orders)
    }

    async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<FilledOrder, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_status(id, status, &mut conn).await
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, NotificationApiError> {
        let mut tx = self.pool.begin().await?;
        let notification = notifications::insert_notification(notification, &mut tx).await?;
        tx.commit().await?;
        Ok(notification)
    }

    async fn notifications_for_user(
        &self,
        user_id: i64,
        pagination: &Pagination,
    ) -> Result<Vec<UserNotification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        let feed = notifications::notifications_for_user(user_id, pagination, &mut conn).await?;
        Ok(feed)
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        let count = notifications::count_for_user(user_id, &mut conn).await?;
        Ok(count)
    }

    async fn count_unread_for_user(&self, user_id: i64) -> Result<i64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        let count = notifications::count_unread_for_user(user_id, &mut conn).await?;
        Ok(count)
    }

    async fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<(), NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        notifications::mark_read(notification_id, user_id, &mut conn).await
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        let n = notifications::mark_all_read(user_id, &mut conn).await?;
        Ok(n)
    }
}

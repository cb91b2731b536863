use bistro_engine::{
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
use mockall::mock;

mock! {
    pub UserManager {}
    impl UserManagement for UserManager {
        async fn create_user(&self, user: NewUser) -> Result<User, UserApiError>;
        async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError>;
        async fn fetch_all_users(&self) -> Result<Vec<User>, UserApiError>;
        async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<User, UserApiError>;
        async fn cart_for_user(&self, user_id: i64) -> Result<Vec<CartLine>, UserApiError>;
        async fn replace_cart(&self, user_id: i64, items: &[CartItem]) -> Result<Vec<CartLine>, UserApiError>;
        async fn merge_cart(&self, user_id: i64, items: &[CartItem]) -> Result<Vec<CartLine>, UserApiError>;
        async fn toggle_wishlist(&self, user_id: i64, food_id: i64) -> Result<bool, UserApiError>;
        async fn wishlist_for_user(&self, user_id: i64) -> Result<Vec<Food>, UserApiError>;
    }
}

mock! {
    pub MenuManager {}
    impl MenuManagement for MenuManager {
        async fn create_food(&self, food: NewFood) -> Result<Food, MenuApiError>;
        async fn update_food(&self, id: i64, update: FoodUpdate) -> Result<Food, MenuApiError>;
        async fn delete_food(&self, id: i64) -> Result<(), MenuApiError>;
        async fn fetch_menu(&self) -> Result<Vec<Food>, MenuApiError>;
        async fn fetch_food_by_id(&self, id: i64) -> Result<Option<Food>, MenuApiError>;
        async fn fetch_food_by_slug(&self, slug: &str) -> Result<Option<Food>, MenuApiError>;
        async fn fetch_photo(&self, id: i64) -> Result<Option<FoodPhoto>, MenuApiError>;
        async fn count_foods(&self) -> Result<i64, MenuApiError>;
        async fn fetch_food_page(&self, page: u32, page_size: u32) -> Result<Vec<Food>, MenuApiError>;
    }
}

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn insert_order(&self, order: NewOrder) -> Result<FilledOrder, OrderApiError>;
        async fn fetch_order_by_id(&self, id: i64) -> Result<Option<FilledOrder>, OrderApiError>;
        async fn orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<FilledOrder>, OrderApiError>;
        async fn fetch_all_orders(&self) -> Result<Vec<FilledOrder>, OrderApiError>;
        async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<FilledOrder, OrderApiError>;
    }
}

mock! {
    pub NotificationManager {}
    impl NotificationManagement for NotificationManager {
        async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, NotificationApiError>;
        async fn notifications_for_user(&self, user_id: i64, pagination: &Pagination) -> Result<Vec<UserNotification>, NotificationApiError>;
        async fn count_for_user(&self, user_id: i64) -> Result<i64, NotificationApiError>;
        async fn count_unread_for_user(&self, user_id: i64) -> Result<i64, NotificationApiError>;
        async fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<(), NotificationApiError>;
        async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError>;
    }
}

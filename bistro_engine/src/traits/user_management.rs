use crate::{
    db_types::{CartItem, CartLine, Food, NewUser, ProfileUpdate, User},
    UserApiError,
};

/// Behaviour for managing user accounts and the state embedded in them (cart, wishlist).
///
/// Password and security-answer hashing happens above this trait; backends only ever see PHC
/// strings.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Creates a new user account. Fails with [`UserApiError::EmailAlreadyRegistered`] if the
    /// email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, UserApiError>;
    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserApiError>;
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError>;
    async fn fetch_all_users(&self) -> Result<Vec<User>, UserApiError>;
    /// Applies a partial profile update and returns the updated record.
    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<User, UserApiError>;

    /// The user's cart, resolved against the menu.
    async fn cart_for_user(&self, user_id: i64) -> Result<Vec<CartLine>, UserApiError>;
    /// Replaces the user's cart wholesale. Last write wins. Entries referencing unknown foods are
    /// dropped silently.
    async fn replace_cart(&self, user_id: i64, items: &[CartItem]) -> Result<Vec<CartLine>, UserApiError>;
    /// Merges the given items into the user's cart, summing quantities for foods already present.
    /// Used to fold a guest cart into the account cart at login.
    async fn merge_cart(&self, user_id: i64, items: &[CartItem]) -> Result<Vec<CartLine>, UserApiError>;

    /// Adds the food to the wishlist if absent, removes it if present. Returns `true` when the
    /// food was added.
    async fn toggle_wishlist(&self, user_id: i64, food_id: i64) -> Result<bool, UserApiError>;
    /// The wishlist resolved to full food records.
    async fn wishlist_for_user(&self, user_id: i64) -> Result<Vec<Food>, UserApiError>;
}

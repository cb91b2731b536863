use crate::{
    db_types::{Food, FoodPhoto, FoodUpdate, NewFood},
    MenuApiError,
};

/// Behaviour for managing the food catalogue.
#[allow(async_fn_in_trait)]
pub trait MenuManagement {
    /// Creates a new food. Fails with [`MenuApiError::DuplicateSlug`] if a food with the same slug
    /// already exists.
    async fn create_food(&self, food: NewFood) -> Result<Food, MenuApiError>;
    /// Applies a partial update and returns the updated record. A new photo replaces the old one.
    async fn update_food(&self, id: i64, update: FoodUpdate) -> Result<Food, MenuApiError>;
    async fn delete_food(&self, id: i64) -> Result<(), MenuApiError>;
    /// The whole menu, newest first. Photo blobs are not included.
    async fn fetch_menu(&self) -> Result<Vec<Food>, MenuApiError>;
    async fn fetch_food_by_id(&self, id: i64) -> Result<Option<Food>, MenuApiError>;
    async fn fetch_food_by_slug(&self, slug: &str) -> Result<Option<Food>, MenuApiError>;
    /// The photo for the given food, if the food exists and has one.
    async fn fetch_photo(&self, id: i64) -> Result<Option<FoodPhoto>, MenuApiError>;
    async fn count_foods(&self) -> Result<i64, MenuApiError>;
    /// One page of the menu, newest first. `page` is 1-based.
    async fn fetch_food_page(&self, page: u32, page_size: u32) -> Result<Vec<Food>, MenuApiError>;
}

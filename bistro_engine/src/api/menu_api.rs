use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Food, FoodPhoto, FoodUpdate, NewFood},
    events::{EventProducers, ProductCreatedEvent, ProductUpdatedEvent},
    helpers::slugify,
    traits::MenuManagement,
    MenuApiError,
};

/// `MenuApi` manages the food catalogue. Writes fire product events so that subscribers (the
/// notification log and the live channel) hear about menu changes.
pub struct MenuApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for MenuApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MenuApi")
    }
}

impl<B> MenuApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> MenuApi<B>
where B: MenuManagement
{
    /// Adds a new food to the menu. The slug is derived from the name; a clash with an existing
    /// slug fails with [`MenuApiError::DuplicateSlug`]. Fires a `ProductCreated` event.
    pub async fn create_food(&self, mut food: NewFood) -> Result<Food, MenuApiError> {
        food.slug = slugify(&food.name);
        let food = self.db.create_food(food).await?;
        info!("🍽️ New food on the menu: {} (#{}, {})", food.name, food.id, food.price);
        self.call_product_created_hook(&food).await;
        Ok(food)
    }

    /// Applies a partial update. Renaming a food re-derives its slug. Fires a `ProductUpdated`
    /// event.
    pub async fn update_food(&self, id: i64, mut update: FoodUpdate) -> Result<Food, MenuApiError> {
        if let Some(name) = &update.name {
            update.slug = Some(slugify(name));
        }
        let food = self.db.update_food(id, update).await?;
        debug!("🍽️ Food #{} updated", food.id);
        self.call_product_updated_hook(&food).await;
        Ok(food)
    }

    pub async fn delete_food(&self, id: i64) -> Result<(), MenuApiError> {
        self.db.delete_food(id).await?;
        info!("🍽️ Food #{id} removed from the menu");
        Ok(())
    }

    pub async fn menu(&self) -> Result<Vec<Food>, MenuApiError> {
        self.db.fetch_menu().await
    }

    pub async fn food_by_id(&self, id: i64) -> Result<Option<Food>, MenuApiError> {
        self.db.fetch_food_by_id(id).await
    }

    pub async fn food_by_slug(&self, slug: &str) -> Result<Option<Food>, MenuApiError> {
        self.db.fetch_food_by_slug(slug).await
    }

    pub async fn photo(&self, id: i64) -> Result<Option<FoodPhoto>, MenuApiError> {
        self.db.fetch_photo(id).await
    }

    pub async fn count(&self) -> Result<i64, MenuApiError> {
        self.db.count_foods().await
    }

    /// One page of the menu, newest first. `page` is 1-based.
    pub async fn page(&self, page: u32, page_size: u32) -> Result<Vec<Food>, MenuApiError> {
        self.db.fetch_food_page(page, page_size).await
    }

    async fn call_product_created_hook(&self, food: &Food) {
        for emitter in &self.producers.product_created_producers {
            debug!("🍽️📬️ Notifying product created hook subscribers");
            let event = ProductCreatedEvent::new(food.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_product_updated_hook(&self, food: &Food) {
        for emitter in &self.producers.product_updated_producers {
            debug!("🍽️📬️ Notifying product updated hook subscribers");
            let event = ProductUpdatedEvent::new(food.clone());
            emitter.publish_event(event).await;
        }
    }
}

use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    OrderStatusChangedEvent,
    ProductCreatedEvent,
    ProductUpdatedEvent,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_status_producers: Vec<EventProducer<OrderStatusChangedEvent>>,
    pub product_created_producers: Vec<EventProducer<ProductCreatedEvent>>,
    pub product_updated_producers: Vec<EventProducer<ProductUpdatedEvent>>,
}

pub struct EventHandlers {
    pub on_order_status_changed: Option<EventHandler<OrderStatusChangedEvent>>,
    pub on_product_created: Option<EventHandler<ProductCreatedEvent>>,
    pub on_product_updated: Option<EventHandler<ProductUpdatedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_status_changed = hooks.on_order_status_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_product_created = hooks.on_product_created.map(|f| EventHandler::new(buffer_size, f));
        let on_product_updated = hooks.on_product_updated.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_status_changed, on_product_created, on_product_updated }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_status_changed {
            result.order_status_producers.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_product_created {
            result.product_created_producers.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_product_updated {
            result.product_updated_producers.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_status_changed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_product_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_product_updated {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_status_changed: Option<Handler<OrderStatusChangedEvent>>,
    pub on_product_created: Option<Handler<ProductCreatedEvent>>,
    pub on_product_updated: Option<Handler<ProductUpdatedEvent>>,
}

impl EventHooks {
    pub fn on_order_status_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderStatusChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_status_changed = Some(Arc::new(f));
        self
    }

    pub fn on_product_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ProductCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_product_created = Some(Arc::new(f));
        self
    }

    pub fn on_product_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ProductUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_product_updated = Some(Arc::new(f));
        self
    }
}

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use bistro_engine::{
    db_types::{NewNotification, NotificationKind},
    events::{EventHandlers, EventHooks, EventProducers},
    MenuApi,
    NotificationApi,
    NotificationManagement,
    OrderFlowApi,
    SqliteDatabase,
    UserApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    live::{LiveBroadcaster, ORDER_STATUS_UPDATED, PRODUCT_CREATED, PRODUCT_UPDATED},
    routes::{
        health,
        AdminAuthRoute,
        AllOrdersRoute,
        AllUsersRoute,
        CreateFoodRoute,
        CreateOrderRoute,
        DeleteFoodRoute,
        FoodPhotoRoute,
        GetCartRoute,
        GetFoodRoute,
        GetMenuRoute,
        GetNotificationsRoute,
        GetOrdersRoute,
        GetWishlistRoute,
        LoginRoute,
        MarkAllReadRoute,
        MarkReadRoute,
        NotificationStreamRoute,
        OrderByIdRoute,
        OrderStatusRoute,
        ProductCountRoute,
        ProductListRoute,
        PutCartRoute,
        RegisterRoute,
        ToggleWishlistRoute,
        UpdateFoodRoute,
        UpdateProfileRoute,
        UserAuthRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let broadcaster = LiveBroadcaster::new();
    let producers = start_event_handlers(db.clone(), broadcaster.clone(), config.event_buffer_size).await;
    let srv = create_server_instance(config, db, producers, broadcaster)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Wires the engine's event hooks to the notification log and the live channel, then starts the
/// handler tasks. A failed notification write is logged and never fails the originating request.
pub async fn start_event_handlers(
    db: SqliteDatabase,
    broadcaster: LiveBroadcaster,
    buffer_size: usize,
) -> EventProducers {
    let mut hooks = EventHooks::default();
    let (status_db, status_bc) = (db.clone(), broadcaster.clone());
    hooks.on_order_status_changed(move |ev| {
        let db = status_db.clone();
        let broadcaster = status_bc.clone();
        Box::pin(async move {
            let order = ev.order;
            let buyer_id = order.order.buyer_id;
            let message = format!("Your order #{} status is now {}", order.order.id, order.order.status);
            let notification = NewNotification::targeted(
                message.clone(),
                NotificationKind::Order,
                vec![buyer_id],
                json!({"order_id": order.order.id, "status": order.order.status}),
            );
            if let Err(e) = db.insert_notification(notification).await {
                error!("📬️ Could not record the order status notification. {e}");
            }
            broadcaster.notify_user(buyer_id, ORDER_STATUS_UPDATED, &json!({"message": message, "order": order}));
        })
    });
    let (created_db, created_bc) = (db.clone(), broadcaster.clone());
    hooks.on_product_created(move |ev| {
        let db = created_db.clone();
        let broadcaster = created_bc.clone();
        Box::pin(async move {
            let food = ev.food;
            let message = format!("New item on the menu: {}", food.name);
            let notification = NewNotification::broadcast(
                message.clone(),
                NotificationKind::Product,
                json!({"food_id": food.id, "slug": food.slug}),
            );
            if let Err(e) = db.insert_notification(notification).await {
                error!("📬️ Could not record the new product notification. {e}");
            }
            broadcaster.broadcast(PRODUCT_CREATED, &json!({"message": message, "food": food}));
        })
    });
    let (updated_db, updated_bc) = (db, broadcaster);
    hooks.on_product_updated(move |ev| {
        let db = updated_db.clone();
        let broadcaster = updated_bc.clone();
        Box::pin(async move {
            let food = ev.food;
            let message = format!("{} has been updated", food.name);
            let notification = NewNotification::broadcast(
                message.clone(),
                NotificationKind::Product,
                json!({"food_id": food.id, "slug": food.slug}),
            );
            if let Err(e) = db.insert_notification(notification).await {
                error!("📬️ Could not record the product update notification. {e}");
            }
            broadcaster.broadcast(PRODUCT_UPDATED, &json!({"message": message, "food": food}));
        })
    });
    let handlers = EventHandlers::new(buffer_size, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    info!("📬️ Event handlers started");
    producers
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    broadcaster: LiveBroadcaster,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let user_api = UserApi::new(db.clone());
        let menu_api = MenuApi::new(db.clone(), producers.clone());
        let order_api = OrderFlowApi::new(db.clone(), producers.clone());
        let notification_api = NotificationApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let jwt_verifier = TokenVerifier::new(&config.auth);
        let cors = match &config.cors_allowed_origin {
            Some(origin) => {
                Cors::default().allowed_origin(origin).allow_any_method().allow_any_header().supports_credentials()
            },
            None => Cors::permissive(),
        };
        // The order-by-id route is registered last so that the literal order paths win.
        let api_scope = web::scope("/api")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(UserAuthRoute::new())
            .service(AdminAuthRoute::new())
            .service(AllUsersRoute::<SqliteDatabase>::new())
            .service(UpdateProfileRoute::<SqliteDatabase>::new())
            .service(GetCartRoute::<SqliteDatabase>::new())
            .service(PutCartRoute::<SqliteDatabase>::new())
            .service(ToggleWishlistRoute::<SqliteDatabase>::new())
            .service(GetWishlistRoute::<SqliteDatabase>::new())
            .service(CreateFoodRoute::<SqliteDatabase>::new())
            .service(UpdateFoodRoute::<SqliteDatabase>::new())
            .service(DeleteFoodRoute::<SqliteDatabase>::new())
            .service(GetMenuRoute::<SqliteDatabase>::new())
            .service(GetFoodRoute::<SqliteDatabase>::new())
            .service(FoodPhotoRoute::<SqliteDatabase>::new())
            .service(ProductCountRoute::<SqliteDatabase>::new())
            .service(ProductListRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(GetOrdersRoute::<SqliteDatabase>::new())
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            .service(OrderStatusRoute::<SqliteDatabase>::new())
            .service(GetNotificationsRoute::<SqliteDatabase>::new())
            .service(MarkReadRoute::<SqliteDatabase>::new())
            .service(MarkAllReadRoute::<SqliteDatabase>::new())
            .service(NotificationStreamRoute::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bistro::access_log"))
            .wrap(cors)
            .app_data(web::Data::new(user_api))
            .app_data(web::Data::new(menu_api))
            .app_data(web::Data::new(order_api))
            .app_data(web::Data::new(notification_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(jwt_verifier))
            .app_data(web::Data::new(broadcaster.clone()))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use bb_common::Cents;
use bistro_engine::{
    db_types::{FilledOrder, Json, Order, OrderLine, OrderStatusType},
    events::EventProducers,
    OrderApiError,
    OrderFlowApi,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::helpers::{admin_token, customer_token, get_request, post_request, put_request};
use crate::{
    endpoint_tests::mocks::MockOrderManager,
    routes::{AllOrdersRoute, CreateOrderRoute, GetOrdersRoute, OrderByIdRoute, OrderStatusRoute},
};

#[actix_web::test]
async fn create_order_for_caller() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let body = json!({"items": [{"food_id": 1, "quantity": 2}], "payment": {"method": "card"}});
    let (status, body) = post_request(&token, "/orders/create-order", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains("\"buyer_id\":42"));
    assert!(body.contains("\"items\":"));
}

#[actix_web::test]
async fn create_order_with_no_items_is_400() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let body = json!({"items": []});
    let (status, _) = post_request(&token, "/orders/create-order", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_order_with_negative_quantity_is_400() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let body = json!({"items": [{"food_id": 1, "quantity": -1000}], "payment": {"method": "card"}});
    let (status, body) = post_request(&token, "/orders/create-order", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not a valid order quantity"));
}

#[actix_web::test]
async fn create_order_requires_token() {
    let _ = env_logger::try_init().ok();
    let body = json!({"items": [{"food_id": 1, "quantity": 2}]});
    let err = post_request("", "/orders/create-order", body, configure).await.expect_err("Expected error");
    assert_eq!(err, "No access token was provided.");
}

#[actix_web::test]
async fn get_orders_returns_own_orders() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let (status, body) = get_request(&token, "/orders/get-orders", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"buyer_id\":42"));
}

#[actix_web::test]
async fn all_orders_requires_admin() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let err = get_request(&token, "/orders/all-orders", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn all_orders_as_admin() {
    let _ = env_logger::try_init().ok();
    let token = admin_token(2);
    let (status, body) = get_request(&token, "/orders/all-orders", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"buyer_id\":42"));
    assert!(body.contains("\"buyer_id\":99"));
}

#[actix_web::test]
async fn order_status_update_as_admin() {
    let _ = env_logger::try_init().ok();
    let token = admin_token(2);
    let body = json!({"status": "Shipped"});
    let (status, body) = put_request(&token, "/orders/order-status/1", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"Shipped\""));
}

#[actix_web::test]
async fn order_status_update_requires_admin() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let body = json!({"status": "Shipped"});
    let err = put_request(&token, "/orders/order-status/1", body, configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn fetch_own_order_by_id() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let (status, body) = get_request(&token, "/orders/1", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"id\":1"));
}

#[actix_web::test]
async fn fetch_another_buyers_order_is_404() {
    let _ = env_logger::try_init().ok();
    // Order 2 belongs to buyer 99. The response must not reveal that it exists.
    let token = customer_token(42);
    let (status, _) = get_request(&token, "/orders/2", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn fetch_another_buyers_order_as_admin() {
    let _ = env_logger::try_init().ok();
    let token = admin_token(2);
    let (status, body) = get_request(&token, "/orders/2", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"buyer_id\":99"));
}

#[actix_web::test]
async fn fetch_unknown_order_is_404() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let (status, _) = get_request(&token, "/orders/777", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn filled_order(id: i64, buyer_id: i64) -> FilledOrder {
    FilledOrder {
        order: Order {
            id,
            buyer_id,
            payment: Json(json!({"method": "card"})),
            status: OrderStatusType::NotProcessed,
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap(),
        },
        items: vec![OrderLine {
            food_id: 1,
            name: "Margherita Pizza".into(),
            quantity: 2,
            unit_price: Cents::from(1299),
        }],
    }
}

fn configure(cfg: &mut ServiceConfig) {
    let mut order_manager = MockOrderManager::new();
    order_manager.expect_insert_order().returning(|order| {
        if order.items.is_empty() {
            Err(OrderApiError::EmptyOrder)
        } else {
            Ok(filled_order(1, order.buyer_id))
        }
    });
    order_manager.expect_fetch_order_by_id().returning(|id| match id {
        1 => Ok(Some(filled_order(1, 42))),
        2 => Ok(Some(filled_order(2, 99))),
        _ => Ok(None),
    });
    order_manager.expect_orders_for_buyer().returning(|buyer_id| Ok(vec![filled_order(1, buyer_id)]));
    order_manager.expect_fetch_all_orders().returning(|| Ok(vec![filled_order(1, 42), filled_order(2, 99)]));
    order_manager.expect_update_order_status().returning(|id, status| {
        let mut order = filled_order(id, 42);
        order.order.status = status;
        Ok(order)
    });
    let api = OrderFlowApi::new(order_manager, EventProducers::default());
    cfg.service(CreateOrderRoute::<MockOrderManager>::new())
        .service(GetOrdersRoute::<MockOrderManager>::new())
        .service(AllOrdersRoute::<MockOrderManager>::new())
        .service(OrderStatusRoute::<MockOrderManager>::new())
        .service(OrderByIdRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(api));
}

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use bb_common::Cents;
use bistro_engine::{db_types::CartLine, UserApi};
use serde_json::json;

use super::helpers::{customer_token, get_request, post_request, put_request, test_food};
use crate::{
    endpoint_tests::mocks::MockUserManager,
    routes::{GetCartRoute, GetWishlistRoute, PutCartRoute, ToggleWishlistRoute},
};

#[actix_web::test]
async fn get_cart_returns_resolved_lines() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let (status, body) = get_request(&token, "/auth/profile/cart", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Margherita Pizza"));
    assert!(body.contains("\"quantity\":2"));
}

#[actix_web::test]
async fn get_cart_requires_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/auth/profile/cart", configure).await.expect_err("Expected error");
    assert_eq!(err, "No access token was provided.");
}

#[actix_web::test]
async fn put_cart_replaces_the_cart() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let body = json!({"items": [{"food_id": 5, "quantity": 3}]});
    let (status, body) = put_request(&token, "/auth/profile/cart", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Lamb Rogan Josh"));
    assert!(body.contains("\"quantity\":3"));
}

#[actix_web::test]
async fn toggle_wishlist_reports_addition() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let body = json!({"food_id": 7});
    let (status, body) = post_request(&token, "/auth/wishlist/toggle", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"added\":true"));
    assert!(body.contains("gulab-jamun"));
}

#[actix_web::test]
async fn toggle_wishlist_reports_removal() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let body = json!({"food_id": 8});
    let (status, body) = post_request(&token, "/auth/wishlist/toggle", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"added\":false"));
}

#[actix_web::test]
async fn get_wishlist_returns_foods() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let (status, body) = get_request(&token, "/auth/wishlist", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Gulab Jamun"));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut user_manager = MockUserManager::new();
    user_manager.expect_cart_for_user().returning(|_| {
        Ok(vec![CartLine { food_id: 1, name: "Margherita Pizza".into(), price: Cents::from(1299), quantity: 2 }])
    });
    user_manager.expect_replace_cart().returning(|_, items| {
        let lines = items
            .iter()
            .map(|i| CartLine {
                food_id: i.food_id,
                name: "Lamb Rogan Josh".into(),
                price: Cents::from(1550),
                quantity: i.quantity,
            })
            .collect();
        Ok(lines)
    });
    // Food 7 is not on the wishlist yet; food 8 is
    user_manager.expect_toggle_wishlist().returning(|_, food_id| Ok(food_id == 7));
    user_manager.expect_wishlist_for_user().returning(|_| Ok(vec![test_food(7, "Gulab Jamun", "gulab-jamun", 450)]));
    let api = UserApi::new(user_manager);
    cfg.service(GetCartRoute::<MockUserManager>::new())
        .service(PutCartRoute::<MockUserManager>::new())
        .service(ToggleWishlistRoute::<MockUserManager>::new())
        .service(GetWishlistRoute::<MockUserManager>::new())
        .app_data(web::Data::new(api));
}

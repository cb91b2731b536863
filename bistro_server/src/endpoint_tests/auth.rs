use actix_web::{http::StatusCode, web, web::ServiceConfig};
use bistro_engine::{db_types::Role, helpers::hash_password, UserApi, UserApiError};
use chrono::{Days, Utc};
use serde_json::json;

use super::helpers::{admin_token, customer_token, get_request, post_request, put_request, test_user};
use crate::{
    auth::JwtClaims,
    endpoint_tests::{helpers::issue_token, mocks::MockUserManager},
    routes::{AdminAuthRoute, AllUsersRoute, LoginRoute, RegisterRoute, UpdateProfileRoute, UserAuthRoute},
};

#[actix_web::test]
async fn register_creates_customer_account() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "name": "Bob",
        "email": "bob@example.com",
        "password": "hunter2-secure",
        "phone": "555-0199",
        "address": "2 Test Lane",
        "answer": "Rex"
    });
    let (status, body) = post_request("", "/auth/register", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains("bob@example.com"));
    assert!(!body.contains("password"));
}

#[actix_web::test]
async fn register_rejects_short_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "name": "Bob",
        "email": "bob@example.com",
        "password": "abc",
        "phone": "555-0199",
        "address": "2 Test Lane",
        "answer": "Rex"
    });
    let (status, _) = post_request("", "/auth/register", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn register_rejects_duplicate_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "name": "Mallory",
        "email": "taken@example.com",
        "password": "hunter2-secure",
        "phone": "555-0199",
        "address": "2 Test Lane",
        "answer": "Rex"
    });
    let (status, body) = post_request("", "/auth/register", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("error"));
}

#[actix_web::test]
async fn login_issues_a_token() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "alice@example.com", "password": "hunter2-secure"});
    let (status, body) = post_request("", "/auth/login", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"token\":"));
    assert!(body.contains("\"cart\":"));
    assert!(body.contains("\"wishlist\":"));
}

#[actix_web::test]
async fn login_rejects_wrong_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "alice@example.com", "password": "wrong-password"});
    let (status, body) = post_request("", "/auth/login", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid email or password"));
}

#[actix_web::test]
async fn login_rejects_unknown_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "nobody@example.com", "password": "hunter2-secure"});
    let (status, body) = post_request("", "/auth/login", body, configure).await.expect("Request failed");
    // Indistinguishable from a bad password, so as not to leak which emails are registered
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid email or password"));
}

#[actix_web::test]
async fn user_auth_without_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/auth/user-auth", configure).await.expect_err("Expected error");
    assert_eq!(err, "No access token was provided.");
}

#[actix_web::test]
async fn user_auth_accepts_customer_token() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let (status, body) = get_request(&token, "/auth/user-auth", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"ok":true}"#);
}

#[actix_web::test]
async fn admin_auth_rejects_customer_token() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let err = get_request(&token, "/auth/admin-auth", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn admin_auth_accepts_admin_token() {
    let _ = env_logger::try_init().ok();
    let token = admin_token(2);
    let (status, body) = get_request(&token, "/auth/admin-auth", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"ok":true}"#);
}

#[actix_web::test]
async fn all_users_requires_admin() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let err = get_request(&token, "/auth/all-users", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn all_users_as_admin() {
    let _ = env_logger::try_init().ok();
    let token = admin_token(2);
    let (status, body) = get_request(&token, "/auth/all-users", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("user1@example.com"));
    assert!(!body.contains("password_hash"));
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let claims = JwtClaims { user_id: 1, email: "user1@example.com".into(), roles: vec![Role::Customer] };
    let token = issue_token(claims, Utc::now() - Days::new(1));
    let err = get_request(&token, "/auth/user-auth", configure).await.expect_err("Expected error");
    assert!(err.contains("Access token is invalid"));
}

#[actix_web::test]
async fn tampered_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut token = customer_token(1);
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let err = get_request(&token, "/auth/user-auth", configure).await.expect_err("Expected error");
    assert!(err.contains("Access token is invalid"));
}

#[actix_web::test]
async fn update_profile_returns_updated_user() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let body = json!({"name": "Alice B."});
    let (status, body) = put_request(&token, "/auth/profile/update", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Alice B."));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut user_manager = MockUserManager::new();
    user_manager.expect_create_user().returning(|new_user| {
        if new_user.email == "taken@example.com" {
            Err(UserApiError::EmailAlreadyRegistered)
        } else {
            let mut user = test_user(1, Role::Customer);
            user.name = new_user.name;
            user.email = new_user.email;
            Ok(user)
        }
    });
    user_manager.expect_fetch_user_by_email().returning(|email| {
        if email == "alice@example.com" {
            let mut user = test_user(1, Role::Customer);
            user.email = "alice@example.com".into();
            user.password_hash = hash_password("hunter2-secure").unwrap();
            Ok(Some(user))
        } else {
            Ok(None)
        }
    });
    user_manager.expect_cart_for_user().returning(|_| Ok(Vec::new()));
    user_manager.expect_wishlist_for_user().returning(|_| Ok(Vec::new()));
    user_manager
        .expect_fetch_all_users()
        .returning(|| Ok(vec![test_user(1, Role::Customer), test_user(2, Role::Admin)]));
    user_manager.expect_update_profile().returning(|id, update| {
        let mut user = test_user(id, Role::Customer);
        if let Some(name) = update.name {
            user.name = name;
        }
        Ok(user)
    });
    let api = UserApi::new(user_manager);
    cfg.service(RegisterRoute::<MockUserManager>::new())
        .service(LoginRoute::<MockUserManager>::new())
        .service(UserAuthRoute::new())
        .service(AdminAuthRoute::new())
        .service(AllUsersRoute::<MockUserManager>::new())
        .service(UpdateProfileRoute::<MockUserManager>::new())
        .app_data(web::Data::new(api));
}

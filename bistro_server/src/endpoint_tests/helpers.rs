use actix_web::{
    body::MessageBody,
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use bb_common::{Cents, Secret};
use bistro_engine::db_types::{Food, Role, User};
use chrono::{DateTime, Days, TimeZone, Utc};
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
};
use serde_json::Value;

use crate::{
    auth::{JwtClaims, TokenIssuer, TokenVerifier},
    config::AuthConfig,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("super-secret-test-signing-key-0123456789abcdef".into()) }
}

pub fn issue_token(claims: JwtClaims, expiry: DateTime<Utc>) -> String {
    let config = get_auth_config();
    let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
    let header = Header::empty().with_token_type("JWT");
    let mut claims = Claims::new(claims);
    claims.expiration = Some(expiry);
    Hs256.token(&header, &claims, &key).expect("Failed to sign token")
}

pub fn customer_token(user_id: i64) -> String {
    let claims =
        JwtClaims { user_id, email: format!("user{user_id}@example.com"), roles: vec![Role::Customer] };
    issue_token(claims, Utc::now() + Days::new(1))
}

pub fn admin_token(user_id: i64) -> String {
    let claims = JwtClaims {
        user_id,
        email: format!("admin{user_id}@example.com"),
        roles: vec![Role::Customer, Role::Admin],
    };
    issue_token(claims, Utc::now() + Days::new(1))
}

pub async fn get_request(
    token: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::get().uri(path);
    if !token.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    call(req, configure).await
}

pub async fn post_request(
    token: &str,
    path: &str,
    body: Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::post().uri(path).set_json(&body);
    if !token.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    call(req, configure).await
}

pub async fn put_request(
    token: &str,
    path: &str,
    body: Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::put().uri(path).set_json(&body);
    if !token.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    call(req, configure).await
}

pub async fn delete_request(
    token: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::delete().uri(path);
    if !token.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    call(req, configure).await
}

async fn call(req: TestRequest, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let req = req.to_request();
    let config = get_auth_config();
    let app = App::new()
        .app_data(web::Data::new(TokenVerifier::new(&config)))
        .app_data(web::Data::new(TokenIssuer::new(&config)))
        .configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub fn test_user(id: i64, role: Role) -> User {
    User {
        id,
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        password_hash: String::new(),
        phone: "555-0100".into(),
        address: "1 Test Lane".into(),
        security_answer_hash: String::new(),
        role,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub fn test_food(id: i64, name: &str, slug: &str, price: i64) -> Food {
    Food {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: format!("A serving of {name}"),
        price: Cents::from(price),
        category: "Mains".to_string(),
        quantity: 20,
        has_photo: false,
        created_at: Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap(),
    }
}

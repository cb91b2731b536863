use actix_web::{
    http::{header, StatusCode},
    test,
    web,
    web::ServiceConfig,
    App,
};
use bistro_engine::{
    db_types::{Json, NotificationKind, UserNotification},
    NotificationApi,
    NotificationApiError,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::helpers::{customer_token, get_auth_config, get_request, put_request};
use crate::{
    auth::TokenVerifier,
    endpoint_tests::mocks::MockNotificationManager,
    live::LiveBroadcaster,
    routes::{GetNotificationsRoute, MarkAllReadRoute, MarkReadRoute, NotificationStreamRoute},
};

#[actix_web::test]
async fn notification_page_with_counts() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let (status, body) =
        get_request(&token, "/notifications/get-notifications", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"total\":12"));
    assert!(body.contains("\"unread_count\":5"));
    assert!(body.contains("\"total_pages\":2"));
    assert!(body.contains("\"current_page\":1"));
    assert!(body.contains("Your order #1 status is now Shipped"));
}

#[actix_web::test]
async fn notification_page_honours_query_parameters() {
    let _ = env_logger::try_init().ok();
    // The mock only answers for page 2 with a limit of 5
    let token = customer_token(1);
    let (status, body) = get_request(&token, "/notifications/get-notifications?page=2&limit=5", configure)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"current_page\":2"));
}

#[actix_web::test]
async fn notifications_require_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/notifications/get-notifications", configure).await.expect_err("Expected error");
    assert_eq!(err, "No access token was provided.");
}

#[actix_web::test]
async fn mark_read_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let (status, body) =
        put_request(&token, "/notifications/mark-read/3", json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"success\":true"));
}

#[actix_web::test]
async fn mark_read_unknown_notification_is_404() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let (status, _) =
        put_request(&token, "/notifications/mark-read/99", json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn mark_all_read_reports_count() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(1);
    let (status, body) =
        put_request(&token, "/notifications/mark-all-read", json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"marked":5}"#);
}

#[actix_web::test]
async fn notification_stream_requires_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/notifications/stream", configure_stream).await.expect_err("Expected error");
    assert_eq!(err, "No access token was provided.");
}

#[actix_web::test]
async fn notification_stream_opens_an_sse_connection() {
    let _ = env_logger::try_init().ok();
    let broadcaster = LiveBroadcaster::new();
    let config = get_auth_config();
    let app = App::new()
        .app_data(web::Data::new(TokenVerifier::new(&config)))
        .app_data(web::Data::new(broadcaster.clone()))
        .service(NotificationStreamRoute::new());
    let service = test::init_service(app).await;

    let token = customer_token(1);
    let req = test::TestRequest::get()
        .uri("/notifications/stream")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    // The response body is an endless event stream, so only the head is inspected.
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "text/event-stream");
    assert_eq!(broadcaster.connection_count(), 1);
}

fn configure_stream(cfg: &mut ServiceConfig) {
    cfg.service(NotificationStreamRoute::new()).app_data(web::Data::new(LiveBroadcaster::new()));
}

fn notification(id: i64, message: &str, kind: NotificationKind, read: bool) -> UserNotification {
    UserNotification {
        id,
        message: message.to_string(),
        kind,
        metadata: Json(json!({})),
        created_at: Utc.with_ymd_and_hms(2024, 3, 6, 10, 0, 0).unwrap(),
        read,
    }
}

fn configure(cfg: &mut ServiceConfig) {
    let mut notification_manager = MockNotificationManager::new();
    notification_manager
        .expect_notifications_for_user()
        .withf(|_, p| p.page() == 1 && p.limit() == 10 || p.page() == 2 && p.limit() == 5)
        .returning(|_, _| {
            Ok(vec![
                notification(3, "Your order #1 status is now Shipped", NotificationKind::Order, false),
                notification(2, "New item on the menu: Masala Dosa", NotificationKind::Product, true),
            ])
        });
    notification_manager.expect_count_for_user().returning(|_| Ok(12));
    notification_manager.expect_count_unread_for_user().returning(|_| Ok(5));
    notification_manager.expect_mark_read().returning(|notification_id, _| {
        if notification_id == 99 {
            Err(NotificationApiError::NotificationNotFound)
        } else {
            Ok(())
        }
    });
    notification_manager.expect_mark_all_read().returning(|_| Ok(5));
    let api = NotificationApi::new(notification_manager);
    cfg.service(GetNotificationsRoute::<MockNotificationManager>::new())
        .service(MarkReadRoute::<MockNotificationManager>::new())
        .service(MarkAllReadRoute::<MockNotificationManager>::new())
        .app_data(web::Data::new(api));
}

use std::time::Duration;

use actix_web::{test, web, App};
use gateway::proxy::{ProxyResource, RouteConfig};
use gateway::routes;
use gateway_test_support::fixtures;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[actix_web::test]
async fn expired_token_triggers_exactly_one_refresh_and_one_retry() {
    let upstream = MockServer::start().await;

    // Attempt 1 with the stale token is rejected
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(header("authorization", "Bearer stale-at"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&upstream)
        .await;

    // Exactly one refresh with the stored refresh token
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refreshToken": "good-rt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "new-at",
            "refreshToken": "new-rt",
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    // Attempt 2 with the fresh token succeeds
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(header("authorization", "Bearer new-at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&upstream)
        .await;

    let state = web::Data::new(fixtures::test_state(&upstream.uri()));
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let cookie = fixtures::session_cookie(&upstream.uri(), "stale-at", "good-rt").unwrap();
    let req = test::TestRequest::get()
        .uri("/api/events")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);

    // The rotated pair is persisted back into the sealed cookie
    let cookie = common::session_cookie_from(&resp).expect("refresh must set a new cookie");
    let session = common::decode_session(&upstream.uri(), cookie);
    assert_eq!(session.access_token.as_deref(), Some("new-at"));
    assert_eq!(session.refresh_token.as_deref(), Some("new-rt"));

    upstream.verify().await;
}

#[actix_web::test]
async fn failed_refresh_destroys_session_and_returns_401_without_a_third_call() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad token"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let state = web::Data::new(fixtures::test_state(&upstream.uri()));
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let cookie = fixtures::session_cookie(&upstream.uri(), "stale-at", "dead-rt").unwrap();
    let req = test::TestRequest::get()
        .uri("/api/events")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);

    // Session cookie is cleared in the browser
    let cookie = common::session_cookie_from(&resp).expect("failed refresh must clear the cookie");
    assert!(cookie.value().is_empty());

    // Exactly two upstream calls: the original attempt and the refresh
    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    upstream.verify().await;
}

#[actix_web::test]
async fn fresh_tokens_still_rejected_fails_closed() {
    let upstream = MockServer::start().await;

    // Both attempts come back 401 even though the refresh succeeded
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .expect(2)
        .mount(&upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "new-at",
            "refreshToken": "new-rt",
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let state = web::Data::new(fixtures::test_state(&upstream.uri()));
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let cookie = fixtures::session_cookie(&upstream.uri(), "stale-at", "good-rt").unwrap();
    let req = test::TestRequest::get()
        .uri("/api/events")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
    let cookie = common::session_cookie_from(&resp).unwrap();
    assert!(cookie.value().is_empty());

    // No second refresh: one original, one refresh, one retry
    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    upstream.verify().await;
}

#[actix_web::test]
async fn rotated_tokens_are_persisted_even_when_the_retry_times_out() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .and(header("authorization", "Bearer stale-at"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "new-at",
            "refreshToken": "new-rt",
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    // The retry with the fresh token stalls past the route timeout
    Mock::given(method("GET"))
        .and(path("/slow"))
        .and(header("authorization", "Bearer new-at"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let state = web::Data::new(fixtures::test_state(&upstream.uri()));
    let app = test::init_service(App::new().app_data(state).configure(|cfg| {
        ProxyResource::new("/api/slow")
            .route(RouteConfig::get("/slow").timeout(Duration::from_millis(250)))
            .register(cfg);
    }))
    .await;

    let cookie = fixtures::session_cookie(&upstream.uri(), "stale-at", "good-rt").unwrap();
    let req = test::TestRequest::get()
        .uri("/api/slow")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    // The retry failure surfaces as 500, but the backend already consumed
    // the old refresh token, so the rotated pair must still be persisted
    assert_eq!(resp.status().as_u16(), 500);
    let cookie = common::session_cookie_from(&resp)
        .expect("rotated tokens must reach the browser on the error response");
    let session = common::decode_session(&upstream.uri(), cookie);
    assert_eq!(session.access_token.as_deref(), Some("new-at"));
    assert_eq!(session.refresh_token.as_deref(), Some("new-rt"));

    upstream.verify().await;
}

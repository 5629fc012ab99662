mod common;

use axum::{body::Body, http::{header, Request, StatusCode}};
use common::{app, offline_settings, post_json, send, Answer, StubRegistrar};
use serde_json::json;

const CHECK: &str = "/api/domain/check";

#[tokio::test]
async fn available_domain_reports_message() {
    let registrar = StubRegistrar::new(Answer::Available);
    let router = app(offline_settings(), registrar.clone());

    let (status, body) = send(router, post_json(CHECK, json!({ "domain": "valid-domain.com" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "available": true,
            "domain": "valid-domain.com",
            "message": "Domain valid-domain.com is available"
        })
    );
    assert_eq!(registrar.queried(), vec!["valid-domain.com"]);
}

#[tokio::test]
async fn taken_domain_is_not_available() {
    let router = app(offline_settings(), StubRegistrar::new(Answer::Taken));

    let (status, body) = send(router, post_json(CHECK, json!({ "domain": "google.com" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert_eq!(body["message"], "Domain google.com is not available");
}

#[tokio::test]
async fn input_is_normalized_before_lookup() {
    let registrar = StubRegistrar::new(Answer::Available);
    let router = app(offline_settings(), registrar.clone());

    let (status, body) = send(
        router,
        post_json(CHECK, json!({ "domain": "  HTTPS://WWW.Example.COM  " })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["domain"], "example.com");
    assert_eq!(registrar.queried(), vec!["example.com"]);
}

#[tokio::test]
async fn implausible_domain_is_rejected_without_lookup() {
    let registrar = StubRegistrar::new(Answer::Available);
    let router = app(offline_settings(), registrar.clone());

    let (status, body) = send(router, post_json(CHECK, json!({ "domain": "ab" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "available": false, "error": "Invalid domain format" }));
    assert!(registrar.queried().is_empty());
}

#[tokio::test]
async fn missing_or_blank_domain_is_rejected() {
    for payload in [json!({}), json!({ "domain": "" }), json!({ "domain": "   " })] {
        let router = app(offline_settings(), StubRegistrar::new(Answer::Available));
        let (status, body) = send(router, post_json(CHECK, payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Domain name required" }));
    }
}

#[tokio::test]
async fn unreadable_body_is_rejected() {
    let router = app(offline_settings(), StubRegistrar::new(Answer::Available));
    let request = Request::builder()
        .method("POST")
        .uri(CHECK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request body" }));
}

#[tokio::test]
async fn registrar_failure_reads_as_unavailable() {
    let router = app(offline_settings(), StubRegistrar::new(Answer::Fails));

    let (status, body) = send(router, post_json(CHECK, json!({ "domain": "example.org" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert_eq!(body["domain"], "example.org");
}

#[tokio::test]
async fn debug_flag_is_ignored_outside_debug_mode() {
    let router = app(offline_settings(), StubRegistrar::new(Answer::Available));

    let (status, body) = send(
        router,
        post_json(CHECK, json!({ "domain": "example.com", "debug": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    assert!(body.get("raw_response").is_none());
}

#[tokio::test]
async fn debug_flag_returns_raw_response_in_debug_mode() {
    let mut settings = offline_settings();
    settings.server.debug = true;
    let router = app(settings, StubRegistrar::new(Answer::Available));

    let (status, body) = send(
        router,
        post_json(CHECK, json!({ "domain": "example.com", "debug": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["domain"], "example.com");
    assert_eq!(body["status_code"], 200);
    assert!(body["raw_response"].as_str().unwrap().contains("<Domain>example.com</Domain>"));
    assert!(body.get("available").is_none());
}

#[tokio::test]
async fn unexpected_fault_returns_generic_error() {
    let router = app(offline_settings(), StubRegistrar::new(Answer::Panics));

    let (status, body) = send(router, post_json(CHECK, json!({ "domain": "example.com" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Unable to check domain availability" }));
}

#[tokio::test]
async fn null_or_non_bool_debug_still_checks_availability() {
    for debug in [json!(null), json!("false"), json!(1), json!(false)] {
        let router = app(offline_settings(), StubRegistrar::new(Answer::Available));
        let (status, body) = send(
            router,
            post_json(CHECK, json!({ "domain": "example.com", "debug": debug })),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "debug = {debug}");
        assert_eq!(body["available"], true);
    }
}

#[tokio::test]
async fn null_debug_in_debug_mode_takes_normal_path() {
    let mut settings = offline_settings();
    settings.server.debug = true;
    let router = app(settings, StubRegistrar::new(Answer::Available));

    let (status, body) = send(
        router,
        post_json(CHECK, json!({ "domain": "example.com", "debug": null })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Domain example.com is available");
    assert!(body.get("raw_response").is_none());
}

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use domainshop_app::AppContext;
use domainshop_kernel::Settings;
use domainshop_registrar::{RawLookup, RegistrarError, RegistrarLookup};
use serde_json::Value;
use tower::ServiceExt;

/// How the stub registrar answers.
#[derive(Clone, Copy)]
pub enum Answer {
    Available,
    Taken,
    Fails,
    Panics,
}

/// In-memory registrar that records every domain it is asked about.
pub struct StubRegistrar {
    answer: Answer,
    pub queried: Mutex<Vec<String>>,
}

impl StubRegistrar {
    pub fn new(answer: Answer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            queried: Mutex::new(Vec::new()),
        })
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistrarLookup for StubRegistrar {
    fn provider(&self) -> &'static str {
        "stub"
    }

    async fn lookup(&self, domain: &str) -> Result<bool, RegistrarError> {
        self.queried.lock().unwrap().push(domain.to_string());
        match self.answer {
            Answer::Available => Ok(true),
            Answer::Taken => Ok(false),
            Answer::Fails => Err(RegistrarError::UnexpectedStatus(503)),
            Answer::Panics => panic!("registrar stub exploded"),
        }
    }

    async fn raw_lookup(&self, domain: &str) -> Result<RawLookup, RegistrarError> {
        self.queried.lock().unwrap().push(domain.to_string());
        Ok(RawLookup {
            status_code: 200,
            body: format!("<ApiResponse Status=\"OK\"><Domain>{}</Domain></ApiResponse>", domain),
        })
    }
}

pub fn app(settings: Settings, registrar: Arc<StubRegistrar>) -> Router {
    let ctx = AppContext::with_registrar(settings, registrar).unwrap();
    domainshop_app::router(&ctx)
}

/// Settings with no live integrations configured.
pub fn offline_settings() -> Settings {
    let mut settings = Settings::default();
    settings.back_office.base_url = String::new();
    settings
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

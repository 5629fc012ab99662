//! Health and integration diagnostics.

pub mod probes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};
use domainshop_kernel::Module;
use serde::Serialize;
use serde_json::json;

use crate::{context::AppContext, utils};
use probes::ProbeResults;

/// Which integrations have configuration, not whether they are alive.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationFlags {
    pub back_office: bool,
    pub zapier: bool,
    pub namecheap: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: String,
    pub integrations: IntegrationFlags,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationReport {
    pub status: &'static str,
    pub results: ProbeResults,
    pub timestamp: String,
}

pub struct DiagnosticsModule {
    ctx: AppContext,
}

#[async_trait]
impl Module for DiagnosticsModule {
    fn name(&self) -> &'static str {
        "diagnostics"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/api/health", get(health))
            .route("/api/test-integrations", get(test_integrations))
            .with_state(self.ctx.clone())
    }

    fn mount_path(&self) -> String {
        "/".to_string()
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/api/health": {
                    "get": {
                        "summary": "Configuration health",
                        "tags": ["Diagnostics"],
                        "responses": { "200": { "description": "Integration configuration flags" } }
                    }
                },
                "/api/test-integrations": {
                    "get": {
                        "summary": "Probe every integration",
                        "tags": ["Diagnostics"],
                        "responses": { "200": { "description": "Per-integration probe status" } }
                    }
                }
            }
        }))
    }
}

/// GET /api/health
async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    let settings = &ctx.settings;
    Json(HealthResponse {
        status: "healthy",
        timestamp: utils::timestamp(),
        service: settings.server.service_name.clone(),
        integrations: IntegrationFlags {
            back_office: settings.back_office.is_configured(),
            zapier: settings.automation.is_configured(),
            namecheap: settings.registrar.is_configured(),
        },
    })
}

/// GET /api/test-integrations
async fn test_integrations(State(ctx): State<AppContext>) -> Json<IntegrationReport> {
    let results = probes::run_all(&ctx).await;
    tracing::info!(?results, "integration probes complete");

    Json(IntegrationReport {
        status: "integration_test_complete",
        results,
        timestamp: utils::timestamp(),
    })
}

/// Create a new instance of the diagnostics module
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(DiagnosticsModule { ctx })
}

//! Availability checker: normalizes a domain query and asks the registrar.

pub mod handlers;
pub mod models;
pub mod normalize;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::post, Router};
use domainshop_kernel::{InitCtx, Module};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::context::AppContext;

pub struct DomainModule {
    ctx: AppContext,
}

impl DomainModule {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for DomainModule {
    fn name(&self) -> &'static str {
        "domain"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if !ctx.settings.registrar.is_configured() {
            tracing::warn!(
                module = self.name(),
                "registrar credentials are not configured, every lookup will report unavailable"
            );
        }
        tracing::info!(
            module = self.name(),
            provider = self.ctx.registrar.provider(),
            sandbox = ctx.settings.registrar.sandbox,
            debug = ctx.settings.server.debug,
            "domain module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/check", post(handlers::check_domain))
            .layer(CatchPanicLayer::custom(handlers::panic_response))
            .with_state(self.ctx.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/check": {
                    "post": {
                        "summary": "Check domain availability",
                        "tags": ["Domain"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CheckRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Availability result",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/CheckResponse" }
                                    }
                                }
                            },
                            "400": { "description": "Missing or malformed domain" },
                            "500": { "description": "Lookup could not be completed" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "CheckRequest": {
                        "type": "object",
                        "properties": {
                            "domain": { "type": "string" },
                            "debug": { "type": "boolean" }
                        },
                        "required": ["domain"]
                    },
                    "CheckResponse": {
                        "type": "object",
                        "properties": {
                            "available": { "type": "boolean" },
                            "domain": { "type": "string" },
                            "message": { "type": "string" }
                        },
                        "required": ["available", "domain", "message"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the domain module
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(DomainModule::new(ctx))
}

//! Purchase submitter: validates a lead and forwards it downstream.

pub mod forward;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::post, Router};
use domainshop_kernel::{InitCtx, Module};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::context::AppContext;

pub struct PurchaseModule {
    ctx: AppContext,
}

impl PurchaseModule {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for PurchaseModule {
    fn name(&self) -> &'static str {
        "purchase"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            back_office = %ctx.settings.back_office.webhook_url(),
            automation = ctx.settings.automation.is_configured(),
            "purchase module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        guarded(Router::new().route("/domain-purchase", post(handlers::submit_purchase)))
            .with_state(self.ctx.clone())
    }

    /// The purchase form posts to a fixed public path.
    fn mount_path(&self) -> String {
        "/".to_string()
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/domain-purchase": {
                    "post": {
                        "summary": "Submit a domain purchase lead",
                        "tags": ["Purchase"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/PurchaseLead" }
                                },
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/PurchaseLead" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Lead accepted by the back office",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/PurchaseResponse" }
                                    }
                                }
                            },
                            "400": { "description": "Missing required field" },
                            "500": { "description": "Back office rejected or unreachable" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "PurchaseLead": {
                        "type": "object",
                        "properties": {
                            "email": { "type": "string", "format": "email" },
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "domain_preference": { "type": "string" },
                            "phone": { "type": "string" }
                        },
                        "required": ["email", "first_name", "domain_preference"]
                    },
                    "PurchaseResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "message": { "type": "string" },
                            "redirect_url": { "type": "string" },
                            "back_office_url": { "type": "string" },
                            "zapier_integrated": { "type": "boolean" }
                        },
                        "required": ["status", "message"]
                    }
                }
            }
        }))
    }
}

/// Panics inside purchase handlers answer in the purchase error shape.
fn guarded(router: Router<AppContext>) -> Router<AppContext> {
    router.layer(CatchPanicLayer::custom(handlers::panic_response))
}

/// Create a new instance of the purchase module
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(PurchaseModule::new(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use domainshop_kernel::Settings;
    use tower::ServiceExt;

    #[tokio::test]
    async fn handler_panic_returns_generic_purchase_error() {
        async fn exploding() -> &'static str {
            panic!("back office token tk_live_123 rejected")
        }

        let ctx = AppContext::new(Settings::default()).unwrap();
        let router = guarded(Router::new().route("/domain-purchase", post(exploding)))
            .with_state(ctx);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/domain-purchase")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "status": "error", "message": "An unexpected error occurred" })
        );
        assert!(!body.to_string().contains("tk_live_123"));
    }
}

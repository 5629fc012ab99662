//! domainshop application library
//!
//! Project modules (availability check, purchase forwarding, diagnostics) and
//! the bootstrap that wires them into the HTTP server.

pub mod context;
pub mod modules;
pub mod utils;

use anyhow::Context;
use domainshop_kernel::{InitCtx, ModuleRegistry, Settings};

pub use context::AppContext;

/// Build a registry with every project module registered against `ctx`.
pub fn registry(ctx: &AppContext) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, ctx);
    registry
}

/// Build the full application router, as served in production.
pub fn router(ctx: &AppContext) -> axum::Router {
    domainshop_http::build_router(&registry(ctx), &ctx.settings)
}

/// Run the server until a shutdown signal arrives.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let ctx = AppContext::new(settings).context("failed to build application context")?;
    let registry = registry(&ctx);
    let init_ctx = InitCtx {
        settings: &ctx.settings,
    };

    registry.init_all(&init_ctx).await?;
    registry.start_all(&init_ctx).await?;

    let served = domainshop_http::start_server(&registry, &ctx.settings).await;

    registry.stop_all().await?;
    served
}

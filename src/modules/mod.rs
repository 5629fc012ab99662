pub mod diagnostics;
pub mod domain;
pub mod purchase;

use domainshop_kernel::ModuleRegistry;

use crate::context::AppContext;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, ctx: &AppContext) {
    registry.register(domain::create_module(ctx.clone()));
    registry.register(purchase::create_module(ctx.clone()));
    registry.register(diagnostics::create_module(ctx.clone()));
}

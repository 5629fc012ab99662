//! Shared, read-only state handed to every module.

use std::sync::Arc;

use anyhow::Context;
use domainshop_kernel::Settings;
use domainshop_registrar::RegistrarLookup;

/// Immutable configuration plus the outbound clients built from it.
///
/// Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub http: reqwest::Client,
    pub registrar: Arc<dyn RegistrarLookup>,
}

impl AppContext {
    /// Build the context with the registrar selected in `settings`.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let http = http_client()?;
        let registrar = domainshop_registrar::from_settings(&settings.registrar, http.clone());
        Ok(Self {
            settings: Arc::new(settings),
            http,
            registrar,
        })
    }

    /// Build the context around an explicit registrar implementation.
    pub fn with_registrar(
        settings: Settings,
        registrar: Arc<dyn RegistrarLookup>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            http: http_client()?,
            registrar,
        })
    }
}

/// One pooled client for every outbound call; timeouts are set per request.
fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build outbound HTTP client")
}

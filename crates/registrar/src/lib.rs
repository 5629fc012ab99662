//! Registrar availability lookups.
//!
//! A [`RegistrarLookup`] answers one question: is this domain free to
//! register? The strict [`RegistrarLookup::lookup`] surfaces every failure,
//! [`RegistrarLookup::is_available`] folds failures into "not available", and
//! [`RegistrarLookup::raw_lookup`] hands back the upstream response untouched
//! for diagnostics.

use std::sync::Arc;

use async_trait::async_trait;
use domainshop_kernel::settings::{RegistrarProvider, RegistrarSettings};

pub mod error;
pub mod namecheap;
pub mod opensrs;

pub use error::RegistrarError;
pub use namecheap::NamecheapClient;
pub use opensrs::OpenSrsClient;

/// Upstream status and body, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLookup {
    pub status_code: u16,
    pub body: String,
}

#[async_trait]
pub trait RegistrarLookup: Send + Sync {
    /// Short provider name used in logs.
    fn provider(&self) -> &'static str;

    /// Ask the registrar and report any failure.
    async fn lookup(&self, domain: &str) -> Result<bool, RegistrarError>;

    /// Issue the lookup request and return the raw response without parsing.
    async fn raw_lookup(&self, domain: &str) -> Result<RawLookup, RegistrarError>;

    /// Fail-closed availability: any error reads as "not available".
    async fn is_available(&self, domain: &str) -> bool {
        match self.lookup(domain).await {
            Ok(available) => available,
            Err(err) => {
                tracing::error!(
                    provider = self.provider(),
                    domain = %domain,
                    error = %err,
                    "registrar lookup failed, reporting domain as unavailable"
                );
                false
            }
        }
    }
}

/// Build the configured registrar client on top of a shared HTTP client.
pub fn from_settings(
    settings: &RegistrarSettings,
    http: reqwest::Client,
) -> Arc<dyn RegistrarLookup> {
    match settings.provider {
        RegistrarProvider::Namecheap => Arc::new(NamecheapClient::new(settings, http)),
        RegistrarProvider::Opensrs => Arc::new(OpenSrsClient::new(settings, http)),
    }
}

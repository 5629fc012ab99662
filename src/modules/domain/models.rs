use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils;

/// Body of `POST /api/domain/check`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub domain: Option<String>,
    /// Ask for the raw registrar response. Honoured only in debug mode.
    /// Any JSON value is accepted; see [`CheckRequest::debug_requested`].
    #[serde(default)]
    pub debug: Option<Value>,
}

impl CheckRequest {
    pub fn debug_requested(&self) -> bool {
        self.debug.as_ref().is_some_and(utils::is_truthy)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResponse {
    pub available: bool,
    pub domain: String,
    pub message: String,
}

impl CheckResponse {
    pub fn new(domain: String, available: bool) -> Self {
        let message = format!(
            "Domain {} is {}",
            domain,
            if available { "available" } else { "not available" }
        );
        Self {
            available,
            domain,
            message,
        }
    }
}

/// Registrar response passed through verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct DebugLookupResponse {
    pub domain: String,
    pub status_code: u16,
    pub raw_response: String,
}
